// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Turkish-aware text helpers used by search and form cleaning.

/// Lowercase with Turkish casing rules (`I` -> `ı`, `İ` -> `i`).
pub fn tr_lower(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'I' => out.push('ı'),
            'İ' => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Lowercase and fold Turkish letters to ASCII for forgiving matches.
///
/// "Çatı Ustası" and "catı ustasi" both normalize to "cati ustasi".
pub fn normalize_tr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'ı' | 'I' | 'İ' => out.push('i'),
            'ş' | 'Ş' => out.push('s'),
            'ğ' | 'Ğ' => out.push('g'),
            'ü' | 'Ü' => out.push('u'),
            'ö' | 'Ö' => out.push('o'),
            'ç' | 'Ç' => out.push('c'),
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// Trim each entry, drop empty ones and keep at most `cap`.
pub fn clean_list(items: &[String], cap: usize) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(cap)
        .map(str::to_string)
        .collect()
}
