//! Deployment title templates and the dispatcher that tries them in order.
//!
//! Every template is a pure function of the commit title. The first template
//! that matches wins; later templates are not consulted.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::{Classification, Commit, CommitType, DeployVersion, DeploymentDetails, Environment};

/// A title that matched one of the deployment templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedTemplate {
    /// Template name, e.g. `single-service-version`.
    pub name: &'static str,
    /// Fields extracted from the title.
    pub details: DeploymentDetails,
}

/// One recognized title grammar.
struct Template {
    name: &'static str,
    pattern: Regex,
    extract: fn(&Captures<'_>) -> Option<DeploymentDetails>,
}

impl Template {
    #[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
    fn new(
        name: &'static str,
        pattern: &str,
        extract: fn(&Captures<'_>) -> Option<DeploymentDetails>,
    ) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            extract,
        }
    }

    fn try_match(&self, title: &str) -> Option<DeploymentDetails> {
        self.pattern
            .captures(title)
            .and_then(|caps| (self.extract)(&caps))
    }
}

// Templates in priority order. Specific single-service forms come before the
// aggregate forms, and the historical formats come last. Keywords, environment
// tokens and word classes fold ASCII case only; `\s` and `\S` stay Unicode.
static TEMPLATES: LazyLock<Vec<Template>> = LazyLock::new(|| {
    vec![
        // Deploy <domain> <service> version <ver> to <env>
        Template::new(
            "single-service-version",
            r"(?i)^(?-u:Deploy)\s+(?P<domain>\S+)\s+(?P<service>\S+)\s+(?-u:version)\s+(?P<version>(?-u:v)?[0-9]+\.[0-9]+\.[0-9]+\S*)\s+(?-u:to)\s+(?P<env>(?-u:prod|sta|dev))$",
            versioned,
        ),
        // Deploy <domain> <service> config changes to <env>
        Template::new(
            "single-service-config",
            r"(?i)^(?-u:Deploy)\s+(?P<domain>\S+)\s+(?P<service>\S+)\s+(?-u:config)\s+(?-u:changes)\s+(?-u:to)\s+(?P<env>(?-u:prod|sta|dev))$",
            single_service_config,
        ),
        // Deploy <domain> services to <env>
        Template::new(
            "domain-services",
            r"(?i)^(?-u:Deploy)\s+(?P<domain>\S+)\s+(?-u:services)\s+(?-u:to)\s+(?P<env>(?-u:prod|sta|dev))$",
            domain_services,
        ),
        // Deploy <domain> services config changes to <env>
        Template::new(
            "domain-services-config",
            r"(?i)^(?-u:Deploy)\s+(?P<domain>\S+)\s+(?-u:services)\s+(?-u:config)\s+(?-u:changes)\s+(?-u:to)\s+(?P<env>(?-u:prod|sta|dev))$",
            domain_services_config,
        ),
        // Deploy <domain> services to <env1> and <env2> [and <env3> ...]
        Template::new(
            "domain-services-multi-env",
            r"(?i)^(?-u:Deploy)\s+(?P<domain>\S+)\s+(?-u:services)\s+(?-u:to)\s+(?P<env>(?-u:sta|prod|dev))(?:\s+(?-u:and)\s+(?-u:sta|prod|dev))+$",
            domain_services_multi_env,
        ),
        // Deploy multiple services to <env>
        Template::new(
            "multiple-domains",
            r"(?i)^(?-u:Deploy)\s+(?-u:multiple)\s+(?-u:services)\s+(?-u:to)\s+(?P<env>(?-u:prod|sta|dev))$",
            multiple_domains,
        ),
        // Deploy config changes to <env>
        Template::new(
            "multiple-domains-config",
            r"(?i)^(?-u:Deploy)\s+(?-u:config)\s+(?-u:changes)\s+(?-u:to)\s+(?P<env>(?-u:prod|sta|dev))$",
            multiple_domains_config,
        ),
        // Deployed <domain> <service> version <ver> to <env>
        Template::new(
            "legacy-deployed",
            r"(?i)^(?-u:Deployed)\s+(?P<domain>\S+)\s+(?P<service>\S+)\s+(?-u:version)\s+(?P<version>(?-u:v)?[0-9]+\.[0-9]+\.[0-9]+\S*)\s+(?-u:to)\s+(?P<env>(?-u:prod|sta|dev))$",
            versioned,
        ),
        // Unanchored, single-spaced, leading `v` required.
        Template::new(
            "legacy-loose",
            r"(?i)(?-u:Deploy)\s(?P<domain>(?-u:[0-9A-Za-z_])\S+)\s(?P<service>(?-u:[0-9A-Za-z_])\S+)\s(?-u:version)\s(?P<version>(?-u:v)[0-9]+\.[0-9]+\.[0-9]+\S*)\s(?-u:to)\s(?P<env>(?-u:prod|sta|dev))",
            versioned,
        ),
    ]
});

/// Returns the template names in evaluation order.
pub fn template_names() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.name).collect()
}

/// Matches a commit title against the templates in priority order.
pub fn classify_title(title: &str) -> Option<MatchedTemplate> {
    let matched = TEMPLATES.iter().find_map(|template| {
        template.try_match(title).map(|details| MatchedTemplate {
            name: template.name,
            details,
        })
    });

    match &matched {
        Some(m) => debug!(matcher = m.name, details = ?m.details, "Matched deployment template"),
        None => debug!(title, "No deployment template matched"),
    }

    matched
}

/// Classifies a commit by its title.
pub fn classify(commit: &Commit) -> Option<DeploymentDetails> {
    classify_title(commit.title()).map(|m| m.details)
}

/// Classifies a commit, returning the flat `{ ok, commit_message }` outcome.
///
/// Never fails: a commit that matches no template yields `ok == false` and the
/// empty placeholder.
pub fn is_deployment_commit(commit: &Commit) -> Classification {
    classify_title(commit.title()).map_or_else(Classification::not_deployment, |m| {
        Classification::deployment(&m)
    })
}

fn text(caps: &Captures<'_>, group: &str) -> Option<String> {
    caps.name(group).map(|m| m.as_str().to_string())
}

fn environment(caps: &Captures<'_>) -> Option<Environment> {
    caps.name("env")?.as_str().parse().ok()
}

fn versioned(caps: &Captures<'_>) -> Option<DeploymentDetails> {
    Some(DeploymentDetails {
        domain: text(caps, "domain")?,
        commit_type: CommitType::Version,
        service: text(caps, "service")?,
        version: DeployVersion::Exact(text(caps, "version")?),
        environment: environment(caps)?,
    })
}

fn single_service_config(caps: &Captures<'_>) -> Option<DeploymentDetails> {
    Some(DeploymentDetails {
        domain: text(caps, "domain")?,
        commit_type: CommitType::Config,
        service: text(caps, "service")?,
        version: DeployVersion::Config,
        environment: environment(caps)?,
    })
}

fn domain_services(caps: &Captures<'_>) -> Option<DeploymentDetails> {
    Some(DeploymentDetails {
        domain: text(caps, "domain")?,
        commit_type: CommitType::Multiple,
        service: "services".to_string(),
        version: DeployVersion::Multiple,
        environment: environment(caps)?,
    })
}

fn domain_services_config(caps: &Captures<'_>) -> Option<DeploymentDetails> {
    Some(DeploymentDetails {
        domain: text(caps, "domain")?,
        commit_type: CommitType::Config,
        service: "services".to_string(),
        version: DeployVersion::Config,
        environment: environment(caps)?,
    })
}

// Only the first listed environment is kept; it picks the announcement channel.
fn domain_services_multi_env(caps: &Captures<'_>) -> Option<DeploymentDetails> {
    Some(DeploymentDetails {
        domain: text(caps, "domain")?,
        commit_type: CommitType::Multiple,
        service: "services".to_string(),
        version: DeployVersion::MultipleEnvs,
        environment: environment(caps)?,
    })
}

fn multiple_domains(caps: &Captures<'_>) -> Option<DeploymentDetails> {
    Some(DeploymentDetails {
        domain: "multiple".to_string(),
        commit_type: CommitType::Multiple,
        service: "services".to_string(),
        version: DeployVersion::Multiple,
        environment: environment(caps)?,
    })
}

fn multiple_domains_config(caps: &Captures<'_>) -> Option<DeploymentDetails> {
    Some(DeploymentDetails {
        domain: "multiple".to_string(),
        commit_type: CommitType::Config,
        service: "config".to_string(),
        version: DeployVersion::Config,
        environment: environment(caps)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commit::CommitMessageDetails;
    use proptest::prelude::*;

    fn commit(message: &str) -> Commit {
        Commit {
            url: "https://github.com/acme/deploys/commit/abc123".to_string(),
            author_username: "testuser".to_string(),
            author_email: "test@example.com".to_string(),
            commit_message: message.to_string(),
        }
    }

    fn matched(title: &str) -> MatchedTemplate {
        classify_title(title).unwrap_or_else(|| panic!("expected a match for {title:?}"))
    }

    // ── individual templates ─────────────────────────────────────────

    #[test]
    fn single_service_version() {
        let m = matched("Deploy mas-billing rating-engine version v1.132.5 to prod");
        assert_eq!(m.name, "single-service-version");
        assert_eq!(
            m.details,
            DeploymentDetails {
                domain: "mas-billing".to_string(),
                commit_type: CommitType::Version,
                service: "rating-engine".to_string(),
                version: DeployVersion::Exact("v1.132.5".to_string()),
                environment: Environment::Prod,
            }
        );
    }

    #[test]
    fn single_service_version_without_v_prefix() {
        let m = matched("Deploy billing api version 2.4.0 to dev");
        assert_eq!(m.name, "single-service-version");
        assert_eq!(m.details.version, DeployVersion::Exact("2.4.0".to_string()));
    }

    #[test]
    fn single_service_version_keeps_prerelease_suffix() {
        let m = matched("Deploy mas-billing api-billing version v2.0.0-RC.1 to sta");
        assert_eq!(
            m.details.version,
            DeployVersion::Exact("v2.0.0-RC.1".to_string())
        );
        assert_eq!(m.details.environment, Environment::Sta);
    }

    #[test]
    fn single_service_config() {
        let m = matched("Deploy billing api-billing config changes to sta");
        assert_eq!(m.name, "single-service-config");
        assert_eq!(m.details.commit_type, CommitType::Config);
        assert_eq!(m.details.domain, "billing");
        assert_eq!(m.details.service, "api-billing");
        assert_eq!(m.details.version, DeployVersion::Config);
    }

    #[test]
    fn domain_services() {
        let m = matched("Deploy billing services to prod");
        assert_eq!(m.name, "domain-services");
        assert_eq!(
            m.details,
            DeploymentDetails {
                domain: "billing".to_string(),
                commit_type: CommitType::Multiple,
                service: "services".to_string(),
                version: DeployVersion::Multiple,
                environment: Environment::Prod,
            }
        );
    }

    #[test]
    fn domain_services_multi_env_keeps_first_environment() {
        let m = matched("Deploy billing services to sta and prod");
        assert_eq!(m.name, "domain-services-multi-env");
        assert_eq!(m.details.version, DeployVersion::MultipleEnvs);
        assert_eq!(m.details.environment, Environment::Sta);
        assert_eq!(m.details.commit_type, CommitType::Multiple);

        let m = matched("Deploy billing services to DEV and sta and prod");
        assert_eq!(m.details.environment, Environment::Dev);
    }

    #[test]
    fn multiple_domains_config() {
        let m = matched("Deploy config changes to dev");
        assert_eq!(m.name, "multiple-domains-config");
        assert_eq!(
            m.details,
            DeploymentDetails {
                domain: "multiple".to_string(),
                commit_type: CommitType::Config,
                service: "config".to_string(),
                version: DeployVersion::Config,
                environment: Environment::Dev,
            }
        );
    }

    #[test]
    fn legacy_deployed() {
        let m = matched("Deployed mas-billing api-billing version v1.37.0 to prod");
        assert_eq!(m.name, "legacy-deployed");
        assert_eq!(m.details.domain, "mas-billing");
        assert_eq!(m.details.service, "api-billing");
        assert_eq!(m.details.version, DeployVersion::Exact("v1.37.0".to_string()));
        assert_eq!(m.details.environment, Environment::Prod);
    }

    #[test]
    fn legacy_loose_matches_inside_title() {
        let m = matched("chore: Deploy mas-billing api version v1.2.3 to prod [skip ci]");
        assert_eq!(m.name, "legacy-loose");
        assert_eq!(m.details.domain, "mas-billing");
        assert_eq!(m.details.service, "api");
        assert_eq!(m.details.version, DeployVersion::Exact("v1.2.3".to_string()));
    }

    #[test]
    fn legacy_loose_reads_environment_prefix() {
        let m = matched("Deploy billing api version v1.2.3 to production");
        assert_eq!(m.name, "legacy-loose");
        assert_eq!(m.details.environment, Environment::Prod);
    }

    #[test]
    fn legacy_loose_requires_v_prefix() {
        assert!(classify_title("ci: Deploy billing api version 1.2.3 to prod").is_none());
    }

    // ── priority ─────────────────────────────────────────────────────

    #[test]
    fn template_order_is_fixed() {
        assert_eq!(
            template_names(),
            vec![
                "single-service-version",
                "single-service-config",
                "domain-services",
                "domain-services-config",
                "domain-services-multi-env",
                "multiple-domains",
                "multiple-domains-config",
                "legacy-deployed",
                "legacy-loose",
            ]
        );
    }

    #[test]
    fn single_service_config_wins_over_domain_services_config() {
        // Both grammars accept this title; the earlier one decides.
        let m = matched("Deploy billing services config changes to prod");
        assert_eq!(m.name, "single-service-config");
        assert_eq!(m.details.service, "services");
        assert_eq!(m.details.commit_type, CommitType::Config);
    }

    #[test]
    fn domain_services_wins_over_multiple_domains() {
        let m = matched("Deploy multiple services to prod");
        assert_eq!(m.name, "domain-services");
        assert_eq!(m.details.domain, "multiple");
        assert_eq!(m.details.version, DeployVersion::Multiple);
    }

    #[test]
    fn anchored_version_wins_over_loose() {
        let m = matched("Deploy billing api version v1.0.0 to prod");
        assert_eq!(m.name, "single-service-version");
    }

    // ── scenarios ────────────────────────────────────────────────────

    #[test]
    fn body_is_ignored() {
        let outcome = is_deployment_commit(&commit(
            "Deploy mas-billing rating-engine version v1.132.5 to prod\n\n- serviceName: rating-engine\n  version: v1.132.5",
        ));
        assert!(outcome.ok);
        assert_eq!(outcome.matcher, Some("single-service-version"));
        assert_eq!(outcome.commit_message.domain, "mas-billing");
        assert_eq!(outcome.commit_message.service, "rating-engine");
        assert_eq!(outcome.commit_message.version, "v1.132.5");
        assert_eq!(outcome.commit_message.environment, "prod");
    }

    #[test]
    fn deployment_keyword_in_body_does_not_count() {
        let outcome =
            is_deployment_commit(&commit("Update README\n\nDeploy billing services to prod"));
        assert!(!outcome.ok);
    }

    #[test]
    fn non_deployment_returns_placeholder() {
        let outcome = is_deployment_commit(&commit("Fix typo in documentation"));
        assert_eq!(outcome, Classification::not_deployment());
        assert_eq!(outcome.commit_message.commit_type, CommitType::Config);
    }

    #[test]
    fn empty_and_blank_messages_do_not_match() {
        for message in ["", " ", "\n", "   \t  ", "\r\n"] {
            assert!(!is_deployment_commit(&commit(message)).ok, "{message:?}");
        }
    }

    #[test]
    fn unknown_environment_does_not_match() {
        assert!(classify_title("Deploy billing services to qa").is_none());
        assert!(classify_title("Deploy billing api version v1.0.0 to uat").is_none());
        assert!(classify_title("Deploy config changes to staging").is_none());
    }

    #[test]
    fn leading_whitespace_defeats_anchored_templates() {
        assert!(classify_title("  Deploy billing services to prod").is_none());
    }

    #[test]
    fn case_folding_is_ascii_only() {
        // U+017F folds to `s` and U+212A to `k` under Unicode rules.
        assert!(classify_title("Deploy billing \u{17F}ervices to prod").is_none());
        assert!(classify_title("Deploy config changes to \u{17F}ta").is_none());
        assert!(classify_title("x Deploy \u{212A}x api version v1.0.0 to prod").is_none());
    }

    #[test]
    fn loose_template_skips_non_ascii_environment() {
        let m = matched(
            "Deploy aa bb version v1.0.0 to \u{17F}ta then Deploy cc dd version v2.0.0 to prod",
        );
        assert_eq!(m.name, "legacy-loose");
        assert_eq!(m.details.domain, "cc");
        assert_eq!(m.details.service, "dd");
        assert_eq!(m.details.version, DeployVersion::Exact("v2.0.0".to_string()));
        assert_eq!(m.details.environment, Environment::Prod);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let m = matched("DEPLOY Billing Api VERSION v1.0.0 TO Prod");
        assert_eq!(m.name, "single-service-version");
        assert_eq!(m.details.domain, "Billing");
        assert_eq!(m.details.service, "Api");
        assert_eq!(m.details.environment, Environment::Prod);
    }

    #[test]
    fn classify_returns_typed_details() {
        let details = classify(&commit("Deploy billing services to sta and dev")).unwrap();
        assert_eq!(details.version, DeployVersion::MultipleEnvs);
        assert_eq!(details.environment, Environment::Sta);
    }

    // ── properties ───────────────────────────────────────────────────

    fn token() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{1,15}"
    }

    fn version() -> impl Strategy<Value = String> {
        "v?[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}(-RC\\.[0-9])?"
    }

    fn env_token() -> impl Strategy<Value = String> {
        prop_oneof!["[pP][rR][oO][dD]", "[sS][tT][aA]", "[dD][eE][vV]"]
    }

    proptest! {
        #[test]
        fn versioned_titles_extract_fields(
            domain in token(),
            service in token(),
            ver in version(),
            env in env_token(),
        ) {
            let title = format!("Deploy {domain} {service} version {ver} to {env}");
            let m = classify_title(&title).unwrap();
            prop_assert_eq!(m.name, "single-service-version");
            prop_assert_eq!(&m.details.domain, &domain);
            prop_assert_eq!(&m.details.service, &service);
            prop_assert_eq!(m.details.version.to_string(), ver);
            prop_assert_eq!(m.details.environment.as_str(), env.to_lowercase());
        }

        #[test]
        fn environment_is_lower_cased(domain in token(), env in env_token()) {
            let outcome = is_deployment_commit(&commit(&format!("Deploy {domain} services to {env}")));
            prop_assert!(outcome.ok);
            prop_assert_eq!(outcome.commit_message.environment, env.to_lowercase());
        }

        #[test]
        fn body_never_changes_result(title in "\\PC{0,60}", body in "(\\PC|\n){0,120}") {
            let bare = is_deployment_commit(&commit(&title));
            let with_body = is_deployment_commit(&commit(&format!("{title}\n{body}")));
            prop_assert_eq!(bare, with_body);
        }

        #[test]
        fn classification_is_repeatable(message in "(\\PC|\n){0,80}") {
            let c = commit(&message);
            prop_assert_eq!(is_deployment_commit(&c), is_deployment_commit(&c));
        }

        #[test]
        fn failure_placeholder_is_empty(message in "(\\PC|\n){0,80}") {
            let outcome = is_deployment_commit(&commit(&message));
            if !outcome.ok {
                prop_assert_eq!(outcome.commit_message, CommitMessageDetails::default());
                prop_assert!(outcome.matcher.is_none());
            } else {
                prop_assert!(!outcome.commit_message.domain.is_empty());
                prop_assert!(!outcome.commit_message.environment.is_empty());
            }
        }
    }
}
