//! Client identities presented to the source.
//!
//! Each outbound attempt picks a random identity from a fixed pool so that
//! repeated calls do not share one fingerprint. This is a best-effort
//! evasion heuristic, not a correctness mechanism: the source may still
//! block any or all identities.

use rand::seq::IndexedRandom;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ClientIdentity {
    pub user_agent: &'static str,
    /// App id sent as `X-IG-App-ID` on API calls; page fetches omit it.
    pub app_id: Option<&'static str>,
}

pub(crate) const API_IDENTITIES: &[ClientIdentity] = &[
    ClientIdentity {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        app_id: Some("936619743392459"),
    },
    ClientIdentity {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        app_id: Some("936619743392459"),
    },
    ClientIdentity {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        app_id: Some("1217981644879628"),
    },
];

pub(crate) const MOBILE_IDENTITIES: &[ClientIdentity] = &[
    ClientIdentity {
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 Safari/604.1",
        app_id: None,
    },
    ClientIdentity {
        user_agent: "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
        app_id: None,
    },
];

pub(crate) const DESKTOP_IDENTITIES: &[ClientIdentity] = &[
    ClientIdentity {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        app_id: None,
    },
    ClientIdentity {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        app_id: None,
    },
    ClientIdentity {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:126.0) Gecko/20100101 Firefox/126.0",
        app_id: None,
    },
];

/// Pick a random identity from `pool`.
pub(crate) fn pick(pool: &'static [ClientIdentity]) -> ClientIdentity {
    let mut rng = rand::rng();
    *pool.choose(&mut rng).expect("identity pools are non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pools_are_non_empty() {
        assert!(!API_IDENTITIES.is_empty());
        assert!(!MOBILE_IDENTITIES.is_empty());
        assert!(!DESKTOP_IDENTITIES.is_empty());
    }

    #[test]
    fn api_identities_carry_an_app_id() {
        assert!(API_IDENTITIES.iter().all(|i| i.app_id.is_some()));
    }

    #[test]
    fn page_identities_carry_no_app_id() {
        assert!(MOBILE_IDENTITIES.iter().all(|i| i.app_id.is_none()));
        assert!(DESKTOP_IDENTITIES.iter().all(|i| i.app_id.is_none()));
    }

    #[test]
    fn pick_returns_a_pool_member() {
        let picked = pick(DESKTOP_IDENTITIES);
        assert!(DESKTOP_IDENTITIES
            .iter()
            .any(|i| i.user_agent == picked.user_agent));
    }
}
