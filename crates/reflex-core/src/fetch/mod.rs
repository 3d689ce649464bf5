//! HTTP GET with randomized client identity and retry.
//!
//! Uses the curl crate (libcurl). Every attempt gets a fresh identity from the
//! `UserAgentPool`, the per-attempt timeout and, if configured, the proxy for
//! both http and https.

mod identity;

pub use identity::UserAgentPool;

use anyhow::Result;
use std::time::Duration;

use crate::config::ReflexConfig;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};

/// Status and body of a completed GET.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can fetch a URL body once; the scan coordinator probes through it.
pub trait Probe: Sync {
    fn probe(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher. Runs in the current thread.
#[derive(Debug, Clone)]
pub struct Fetcher {
    timeout: Duration,
    agents: UserAgentPool,
    proxy: Option<String>,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(
        timeout: Duration,
        agents: UserAgentPool,
        proxy: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            timeout,
            agents,
            proxy: proxy.filter(|p| !p.trim().is_empty()),
            retry,
        }
    }

    /// Builds a fetcher from config; `proxy` applies to every request it makes.
    pub fn from_config(cfg: &ReflexConfig, proxy: Option<String>) -> Result<Self> {
        let agents = UserAgentPool::new(cfg.user_agents.iter().cloned())
            .ok_or_else(|| anyhow::anyhow!("user_agents must contain at least one entry"))?;
        Ok(Self::new(cfg.timeout(), agents, proxy, cfg.retry_policy()))
    }

    /// Same identities and timeout, but no proxy and a single attempt.
    pub fn direct_single_attempt(&self) -> Self {
        Self {
            proxy: None,
            retry: RetryPolicy::no_retry(),
            ..self.clone()
        }
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// One GET attempt. Follows redirects; returns the response whatever its status.
    pub fn get_once(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.timeout(self.timeout)?;
        easy.useragent(self.agents.pick())?;
        // Empty string enables every encoding libcurl was built with.
        easy.accept_encoding("")?;
        if let Some(proxy) = &self.proxy {
            easy.proxy(proxy)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(FetchResponse { status, body })
    }

    /// GET with retry: transport errors and non-2xx statuses are retried per policy.
    pub fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        run_with_retry(&self.retry, url, |_attempt| {
            let resp = self.get_once(url)?;
            if !resp.is_success() {
                return Err(FetchError::Http(resp.status));
            }
            Ok(resp)
        })
    }
}

impl Probe for Fetcher {
    /// Single attempt, status not checked: an error page that reflects the
    /// marker still counts.
    fn probe(&self, url: &str) -> Result<String, FetchError> {
        self.get_once(url).map(|r| r.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_success_range() {
        let ok = FetchResponse {
            status: 204,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        let missing = FetchResponse {
            status: 404,
            body: b"not found".to_vec(),
        };
        assert!(!missing.is_success());
        assert_eq!(missing.text(), "not found");
    }

    #[test]
    fn text_is_lossy() {
        let r = FetchResponse {
            status: 200,
            body: vec![b'a', 0xff, b'b'],
        };
        assert_eq!(r.text(), "a\u{fffd}b");
    }

    #[test]
    fn blank_proxy_ignored() {
        let cfg = ReflexConfig::default();
        let f = Fetcher::from_config(&cfg, Some("  ".to_string())).unwrap();
        assert!(f.proxy().is_none());
        let f = Fetcher::from_config(&cfg, Some("http://127.0.0.1:8080".to_string())).unwrap();
        assert_eq!(f.proxy(), Some("http://127.0.0.1:8080"));
    }

    #[test]
    fn direct_single_attempt_drops_proxy_and_retry() {
        let cfg = ReflexConfig::default();
        let f = Fetcher::from_config(&cfg, Some("http://127.0.0.1:8080".to_string())).unwrap();
        let direct = f.direct_single_attempt();
        assert!(direct.proxy().is_none());
        assert_eq!(direct.retry_policy().max_attempts, 1);
        assert_eq!(f.retry_policy().max_attempts, 3);
    }

    #[test]
    fn from_config_rejects_empty_identity_pool() {
        let cfg = ReflexConfig {
            user_agents: Vec::new(),
            ..ReflexConfig::default()
        };
        assert!(Fetcher::from_config(&cfg, None).is_err());
    }

    #[test]
    fn refused_connection_fails_after_policy_attempts() {
        // Bind then drop to get a port with nothing listening.
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let cfg = ReflexConfig::default();
        let agents = UserAgentPool::new(cfg.user_agents.clone()).unwrap();
        let fetcher = Fetcher::new(
            Duration::from_secs(2),
            agents,
            None,
            RetryPolicy {
                max_attempts: 3,
                delay: Duration::ZERO,
            },
        );
        let res = fetcher.fetch(&format!("http://127.0.0.1:{}/", port));
        assert!(matches!(res, Err(FetchError::Curl(_))));
    }
}
