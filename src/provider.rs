//! Hosting-provider detection and blob link formatting.

use crate::diagnostic::DiagnosticLine;
use crate::git::RepositoryContext;

/// Source hosting provider of the origin remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    GitHub,
    GitLab,
    Bitbucket,
    Unknown,
}

/// Host tokens in detection priority order.
const HOST_TOKENS: [(&str, Provider); 3] = [
    ("github.com", Provider::GitHub),
    ("gitlab.com", Provider::GitLab),
    ("bitbucket.org", Provider::Bitbucket),
];

impl Provider {
    /// Detect the provider by case-insensitive substring match; first
    /// token in priority order wins.
    pub fn detect(remote_url: &str) -> Provider {
        let lower = remote_url.to_lowercase();
        HOST_TOKENS
            .iter()
            .find(|(token, _)| lower.contains(*token))
            .map(|(_, provider)| *provider)
            .unwrap_or(Provider::Unknown)
    }
}

/// Turns findings into links for one repository snapshot.
///
/// Only built by `select`, so `provider` is never `Provider::Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFormatter {
    provider: Provider,
    remote_url: String,
    branch_hash: String,
}

impl LinkFormatter {
    /// Returns `None` for unknown hosts; annotation is then skipped.
    pub fn select(ctx: &RepositoryContext) -> Option<LinkFormatter> {
        match Provider::detect(&ctx.remote_url) {
            Provider::Unknown => None,
            provider => Some(LinkFormatter {
                provider,
                remote_url: ctx.remote_url.clone(),
                branch_hash: ctx.branch_hash.clone(),
            }),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// `<remote>/blob/<hash><path>#L<line>:<message>`, shared by every
    /// supported provider.
    pub fn format(&self, line: &DiagnosticLine) -> String {
        format!(
            "{}/blob/{}{}#L{}:{}",
            self.remote_url, self.branch_hash, line.relative_path, line.line, line.message
        )
    }
}
