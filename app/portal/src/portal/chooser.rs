//! Application choice for `ChooseApplication`.
//!
//! There is no interactive picker. A [`ChoicePolicy`] decides, and the
//! [`ChoiceResolver`] holds every policy to the same contract: the decision
//! must be one of the offered candidates, otherwise there is no choice.

use super::error::PortalError;
use super::reply::Options;
use crate::config::ChooserPolicyKind;

/// Portal option carrying the application the user picked last time.
pub const LAST_CHOICE_OPTION: &str = "last_choice";

/// A `ChooseApplication` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoiceRequest {
    pub handle: String,
    pub requester_app: String,
    pub presentation_handle: String,
    /// Desktop file ids offered by the frontend, in its order.
    pub candidates: Vec<String>,
    pub options: Options,
}

/// Strategy deciding which candidate is chosen.
pub trait ChoicePolicy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Returns the chosen candidate id, or `None` to decline.
    ///
    /// Only called with a non-empty candidate list.
    fn decide(&self, request: &ChoiceRequest) -> Option<String>;
}

/// Always picks the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl ChoicePolicy for FirstCandidate {
    fn name(&self) -> &'static str { "first" }

    fn decide(&self, request: &ChoiceRequest) -> Option<String> { request.candidates.first().cloned() }
}

/// Picks the caller's previous choice when it is still offered.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastChoice;

impl ChoicePolicy for LastChoice {
    fn name(&self) -> &'static str { "lastChoice" }

    fn decide(&self, request: &ChoiceRequest) -> Option<String> {
        let previous = request.options.get(LAST_CHOICE_OPTION).and_then(serde_json::Value::as_str);

        previous
            .filter(|previous| request.candidates.iter().any(|candidate| candidate == previous))
            .map(str::to_string)
            .or_else(|| FirstCandidate.decide(request))
    }
}

/// Builds the policy selected in the configuration.
#[must_use]
pub fn policy_for(kind: ChooserPolicyKind) -> Box<dyn ChoicePolicy> {
    match kind {
        ChooserPolicyKind::First => Box::new(FirstCandidate),
        ChooserPolicyKind::LastChoice => Box::new(LastChoice),
    }
}

/// Runs the configured policy under the common choice contract.
pub struct ChoiceResolver {
    policy: Box<dyn ChoicePolicy>,
}

impl ChoiceResolver {
    #[must_use]
    pub fn new(policy: Box<dyn ChoicePolicy>) -> Self { Self { policy } }

    #[must_use]
    pub fn policy_name(&self) -> &'static str { self.policy.name() }

    /// Chooses one of the request's candidates.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::NoChoice`] for an empty candidate list or when
    /// the policy declines or answers with an id that was not offered.
    pub fn choose(&self, request: &ChoiceRequest) -> Result<String, PortalError> {
        if request.candidates.is_empty() {
            return Err(PortalError::NoChoice);
        }

        let choice = self.policy.decide(request).ok_or(PortalError::NoChoice)?;
        if !request.candidates.contains(&choice) {
            tracing::warn!("policy {} chose {choice}, which was not offered", self.policy.name());
            return Err(PortalError::NoChoice);
        }

        Ok(choice)
    }

    /// Accepts an updated candidate list for an open dialog.
    ///
    /// Choices are made synchronously, so there is never an open dialog to
    /// update. The call is logged and has no effect.
    pub fn update_choices(&self, handle: &str, candidates: &[String]) {
        tracing::debug!("ignoring {} updated choices for {handle}", candidates.len());
    }
}

impl std::fmt::Debug for ChoiceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChoiceResolver").field("policy", &self.policy.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Fixed(Option<&'static str>);

    impl ChoicePolicy for Fixed {
        fn name(&self) -> &'static str { "fixed" }

        fn decide(&self, _request: &ChoiceRequest) -> Option<String> { self.0.map(str::to_string) }
    }

    fn request(candidates: &[&str]) -> ChoiceRequest {
        ChoiceRequest {
            handle: "/org/freedesktop/portal/desktop/request/1_1/t".into(),
            requester_app: "org.example.App".into(),
            candidates: candidates.iter().map(ToString::to_string).collect(),
            ..ChoiceRequest::default()
        }
    }

    #[test]
    fn test_first_candidate_policy() {
        let resolver = ChoiceResolver::new(Box::new(FirstCandidate));
        assert_eq!(resolver.choose(&request(&["a.desktop", "b.desktop"])).unwrap(), "a.desktop");
    }

    #[test]
    fn test_empty_candidates_is_no_choice() {
        let resolver = ChoiceResolver::new(Box::new(Fixed(Some("a.desktop"))));
        assert_eq!(resolver.choose(&request(&[])), Err(PortalError::NoChoice));
    }

    #[test]
    fn test_declined_or_foreign_decision_is_no_choice() {
        let declined = ChoiceResolver::new(Box::new(Fixed(None)));
        assert_eq!(declined.choose(&request(&["a.desktop"])), Err(PortalError::NoChoice));

        let foreign = ChoiceResolver::new(Box::new(Fixed(Some("evil.desktop"))));
        assert_eq!(foreign.choose(&request(&["a.desktop"])), Err(PortalError::NoChoice));
    }

    #[test]
    fn test_last_choice_prefers_offered_previous_choice() {
        let resolver = ChoiceResolver::new(Box::new(LastChoice));
        let mut req = request(&["a.desktop", "b.desktop"]);
        req.options.insert(LAST_CHOICE_OPTION.into(), json!("b.desktop"));
        assert_eq!(resolver.choose(&req).unwrap(), "b.desktop");
    }

    #[test]
    fn test_last_choice_falls_back_to_first() {
        let resolver = ChoiceResolver::new(Box::new(LastChoice));
        let mut req = request(&["a.desktop", "b.desktop"]);
        req.options.insert(LAST_CHOICE_OPTION.into(), json!("gone.desktop"));
        assert_eq!(resolver.choose(&req).unwrap(), "a.desktop");

        req.options.clear();
        assert_eq!(resolver.choose(&req).unwrap(), "a.desktop");
    }

    #[test]
    fn test_update_choices_does_not_affect_choose() {
        let resolver = ChoiceResolver::new(Box::new(FirstCandidate));
        let req = request(&["a.desktop", "b.desktop"]);
        resolver.update_choices(&req.handle, &["b.desktop".to_string()]);
        assert_eq!(resolver.choose(&req).unwrap(), "a.desktop");
    }

    #[test]
    fn test_policy_for_config_kind() {
        assert_eq!(policy_for(ChooserPolicyKind::First).name(), "first");
        assert_eq!(policy_for(ChooserPolicyKind::LastChoice).name(), "lastChoice");
    }
}
