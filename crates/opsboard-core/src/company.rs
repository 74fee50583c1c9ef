//! Company master lookup for incoming calls
//!
//! A call names a company and a caller. Several master entries can share a
//! company name (one per owner), so the caller is compared to each owner and
//! the closest one wins.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entry in the company master list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    #[serde(alias = "CompanyName", alias = "companyName")]
    pub company_name: String,
    #[serde(alias = "Owner")]
    pub owner: String,
    #[serde(alias = "CompanyCode", alias = "companyCode")]
    pub company_code: String,
}

impl CompanyInfo {
    pub fn new(company_name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            owner: owner.into(),
            ..Self::default()
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.company_code = code.into();
        self
    }
}

/// Character-multiset overlap between two strings, in `[0, 1]`.
///
/// Case-insensitive. Each character of `a` consumes one matching character
/// of `b`; the match count is divided by the longer length.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }

    let mut pool: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *pool.entry(c).or_default() += 1;
    }

    let matched = a
        .chars()
        .filter(|c| match pool.get_mut(c) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        })
        .count();

    matched as f64 / longest as f64
}

/// Find the master entry for a call.
///
/// Company names compare trimmed and case-insensitively. A single candidate
/// is returned as is; among several, the owner most similar to `caller`
/// wins. `None` when nothing matches or no owner resembles the caller.
pub fn find_company_for_call<'a>(
    company: &str,
    caller: &str,
    master: &'a [CompanyInfo],
) -> Option<&'a CompanyInfo> {
    let company = company.trim().to_lowercase();
    let caller = caller.trim().to_lowercase();

    let candidates: Vec<&CompanyInfo> = master
        .iter()
        .filter(|c| c.company_name.trim().to_lowercase() == company)
        .collect();

    if let [only] = candidates.as_slice() {
        return Some(*only);
    }
    if caller.is_empty() {
        return None;
    }

    let mut best: Option<(&CompanyInfo, f64)> = None;
    for candidate in candidates {
        let owner = candidate.owner.trim().to_lowercase();
        if owner.is_empty() {
            continue;
        }
        let score = similarity(&owner, &caller);
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn master() -> Vec<CompanyInfo> {
        vec![
            CompanyInfo::new("Acme Traders", "Ravi Kumar").code("ACM1"),
            CompanyInfo::new("Acme Traders", "Sunita Shah").code("ACM2"),
            CompanyInfo::new("Globex", "Hank Scorpio").code("GLX"),
        ]
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity("abc", "abc"), 1.0);
        assert_eq!(similarity("ABC", "cab"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("aab", "ab"), 2.0 / 3.0);
    }

    #[test]
    fn single_candidate_wins_regardless_of_caller() {
        let master = master();
        let found = find_company_for_call(" globex ", "someone else", &master).unwrap();
        assert_eq!(found.company_code, "GLX");
    }

    #[test]
    fn closest_owner_among_duplicates() {
        let master = master();
        let found = find_company_for_call("acme traders", "Sunita", &master).unwrap();
        assert_eq!(found.company_code, "ACM2");

        let found = find_company_for_call("Acme Traders", "ravi k", &master).unwrap();
        assert_eq!(found.company_code, "ACM1");
    }

    #[test]
    fn no_match() {
        let master = master();
        assert_eq!(find_company_for_call("Initech", "Bill", &master), None);
        assert_eq!(find_company_for_call("Acme Traders", "", &master), None);
        assert_eq!(find_company_for_call("Acme Traders", "zzz", &master), None);
    }

    #[test]
    fn deserializes_master_aliases() {
        let info: CompanyInfo =
            serde_json::from_str(r#"{"CompanyName":"Globex","owner":"Hank","CompanyCode":"GLX"}"#).unwrap();
        assert_eq!(info, CompanyInfo::new("Globex", "Hank").code("GLX"));
    }
}
