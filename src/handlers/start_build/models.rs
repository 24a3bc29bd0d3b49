use std::str::FromStr;

use deploy_notifications::lambda_structure::http_lambda_main::RequestExtractor;
use deploy_notifications::notifications::approval_card::{APPROVE_ACTION, DECLINE_ACTION};
use lambda_http::Request;
use model::project::ProjectIdentifier;
use validator::Validate;

pub const ACTION_QUERY_PARAM: &str = "action";
pub const PROJECT_NAME_QUERY_PARAM: &str = "project_name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve,
    Decline,
}

impl FromStr for ApprovalAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            APPROVE_ACTION => Ok(Self::Approve),
            DECLINE_ACTION => Ok(Self::Decline),
            _ => Err(()),
        }
    }
}

/// Decision carried by the query string of an approval card action.
#[derive(Debug, Validate)]
pub struct ApprovalDecision {
    pub action: ApprovalAction,
    #[validate(length(min = 1))]
    pub project_name: String,
}

impl ApprovalDecision {
    /// Returns `None` for unknown actions and missing or empty project names.
    /// The project name is kept verbatim.
    pub fn from_request(request: &Request) -> Option<Self> {
        let decision = Self {
            action: request.extract_query_param(ACTION_QUERY_PARAM).ok()?,
            project_name: request.extract_query_param(PROJECT_NAME_QUERY_PARAM).ok()?,
        };

        decision.validate().ok().map(|_| decision)
    }

    pub fn project(&self) -> ProjectIdentifier {
        ProjectIdentifier::new(self.project_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use common::test_tools::http::helpers::build_request_with_query;
    use rstest::rstest;

    use super::{ApprovalAction, ApprovalDecision};

    #[rstest]
    #[case::approve("approve", ApprovalAction::Approve)]
    #[case::decline("decline", ApprovalAction::Decline)]
    fn parses_known_actions(#[case] action: &str, #[case] expected: ApprovalAction) {
        let request = build_request_with_query(&[("action", action), ("project_name", "proj-x")]);

        let decision = ApprovalDecision::from_request(&request).unwrap();

        assert_eq!(expected, decision.action);
        assert_eq!("proj-x", decision.project().as_str());
    }

    #[rstest]
    #[case::unknown_action(&[("action", "maybe"), ("project_name", "proj-x")])]
    #[case::uppercase_action(&[("action", "APPROVE"), ("project_name", "proj-x")])]
    #[case::missing_action(&[("project_name", "proj-x")])]
    #[case::missing_project(&[("action", "approve")])]
    #[case::empty_project(&[("action", "approve"), ("project_name", "")])]
    fn rejects_incomplete_decisions(#[case] params: &[(&str, &str)]) {
        let request = build_request_with_query(params);

        assert!(ApprovalDecision::from_request(&request).is_none());
    }

    #[rstest]
    #[case::padded(" proj-x ")]
    #[case::blank("  ")]
    fn keeps_project_name_verbatim(#[case] project_name: &str) {
        let request =
            build_request_with_query(&[("action", "decline"), ("project_name", project_name)]);

        let decision = ApprovalDecision::from_request(&request).unwrap();

        assert_eq!(project_name, decision.project().as_str());
    }
}
