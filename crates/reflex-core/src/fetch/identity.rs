//! Randomized client identity (User-Agent) selection.

use rand::seq::SliceRandom;

/// Non-empty pool of User-Agent strings; each request picks one uniformly.
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Builds a pool from `agents`, dropping blank entries.
    /// Returns `None` if nothing usable remains.
    pub fn new<I, S>(agents: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let agents: Vec<String> = agents
            .into_iter()
            .map(|s| {
                let s: String = s.into();
                s.trim().to_string()
            })
            .filter(|s| !s.is_empty())
            .collect();
        if agents.is_empty() {
            None
        } else {
            Some(Self { agents })
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    /// Uniform random pick.
    pub fn pick(&self) -> &str {
        self.agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or_default()
    }
}
