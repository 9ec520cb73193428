//! Pure classification of repository references.
//!
//! [`InputClassifier::classify`] never fails and never performs I/O; it
//! decides from string shape alone whether the input is a local path, a
//! provider-specific Git URL, a generic Git URL, or unrecognizable.

use super::{ClassificationResult, InputType};

/// Recognized hosting providers: host, provider name, input type.
const PROVIDERS: &[(&str, &str, InputType)] = &[
    ("github.com", "github", InputType::GithubUrl),
    ("gitlab.com", "gitlab", InputType::GitlabUrl),
    ("bitbucket.org", "bitbucket", InputType::BitbucketUrl),
];

pub struct InputClassifier;

impl InputClassifier {
    /// Classifies a raw repository reference.
    ///
    /// Total over all string inputs: empty or unrecognizable strings
    /// yield `Unknown` with confidence 0. Local-path detection takes
    /// precedence only when the string does not parse as a URL.
    pub fn classify(raw: &str) -> ClassificationResult {
        let input = raw.trim();

        if input.is_empty() {
            return unknown();
        }

        // Local-path shapes never parse as URLs, so they short-circuit.
        if input.starts_with('/')
            || input.starts_with("./")
            || input.starts_with("../")
            || input.starts_with("~/")
            || input == "."
            || input == ".."
        {
            return local_path();
        }

        let scheme_host = scheme_host(input);
        let scp_host = scp_host(input);

        if let Some(host) = scheme_host.as_deref() {
            for (provider_host, provider, input_type) in PROVIDERS {
                if host == *provider_host {
                    return ClassificationResult {
                        input_type: *input_type,
                        provider: provider.to_string(),
                        confidence: 0.9,
                    };
                }
            }
        }

        if let Some(host) = scp_host.as_deref() {
            for (provider_host, provider, input_type) in PROVIDERS {
                if host == *provider_host {
                    return ClassificationResult {
                        input_type: *input_type,
                        provider: provider.to_string(),
                        confidence: 0.85,
                    };
                }
            }
        }

        // Unmatched hosts still count as Git URLs when the string is
        // unmistakably git-shaped.
        if input.starts_with("git@") || scp_host.is_some() {
            return generic_git(0.75);
        }
        if input.contains("git://") || input.ends_with(".git") || input.contains(".git/") {
            return generic_git(0.7);
        }

        if scheme_host.is_some() {
            // A URL, but neither a known provider nor git-shaped.
            return unknown();
        }

        // No URL or SCP-like markers: treat as a relative local path.
        local_path()
    }
}

/// Extracts the host from a `scheme://[user[:pass]@]host[:port]/...`
/// form, or `None` if the string has no scheme.
fn scheme_host(input: &str) -> Option<String> {
    let rest = input.split_once("://")?.1;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    let host = host_port.split(':').next()?;
    if host.is_empty() {
        None
    } else {
        Some(host.to_ascii_lowercase())
    }
}

/// Extracts the host from an SCP-like `user@host:path` form.
fn scp_host(input: &str) -> Option<String> {
    if input.contains("://") {
        return None;
    }
    let (user, rest) = input.split_once('@')?;
    let (host, path) = rest.split_once(':')?;
    if user.is_empty() || host.is_empty() || path.is_empty() || host.contains('/') {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

fn unknown() -> ClassificationResult {
    ClassificationResult {
        input_type: InputType::Unknown,
        provider: String::new(),
        confidence: 0.0,
    }
}

fn local_path() -> ClassificationResult {
    ClassificationResult {
        input_type: InputType::LocalPath,
        provider: String::new(),
        confidence: 1.0,
    }
}

fn generic_git(confidence: f64) -> ClassificationResult {
    ClassificationResult {
        input_type: InputType::GenericGitUrl,
        provider: "generic".to_string(),
        confidence,
    }
}
