//! Linear tools bridged through the Composio relay of the Promo Studio web API.

use promo_core::gate::ToolGroup;
use rmcp::schemars;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::ToolDescriptor;
use crate::helpers;

use super::EmptyParams;

const SERVICE: &str = "Linear";
const GROUPS: &[ToolGroup] = &[ToolGroup::Linear];

fn linear<P>(name: &'static str, description: &'static str, slug: &'static str) -> ToolDescriptor
where
    P: Serialize + DeserializeOwned + schemars::JsonSchema + Send + Sync + 'static,
{
    helpers::composio_descriptor::<P>(name, description, GROUPS, SERVICE, slug)
}

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        linear::<CreateIssueParams>(
            "linear_create_issue",
            "Creates a new issue in a specified linear project and team, requiring a title \
             and description, and allowing for optional properties like assignee, state, \
             priority, cycle, and due date.",
            "LINEAR_CREATE_LINEAR_ISSUE",
        ),
        linear::<UpdateIssueParams>(
            "linear_update_issue",
            "Updates an existing linear issue using its `issue id`; requires at least one \
             other attribute for modification, and all provided entity ids (for state, \
             assignee, labels, etc.) must be valid.",
            "LINEAR_UPDATE_ISSUE",
        ),
        linear::<CreateCommentParams>(
            "linear_create_comment",
            "Creates a new comment on a specified linear issue.",
            "LINEAR_CREATE_LINEAR_COMMENT",
        ),
        linear::<ListIssuesParams>(
            "linear_list_issues",
            "Lists non-archived linear issues; if project id is not specified, issues from \
             all accessible projects are returned. can also filter by assignee id to get \
             issues assigned to a specific user.",
            "LINEAR_LIST_LINEAR_ISSUES",
        ),
        linear::<EmptyParams>(
            "linear_list_cycles",
            "Retrieves all cycles (time-boxed iterations for work) from the linear account; \
             no filters are applied.",
            "LINEAR_LIST_LINEAR_CYCLES",
        ),
        linear::<GetCyclesByTeamParams>(
            "linear_get_cycles_by_team_id",
            "Retrieves all cycles for a specified linear team id; cycles are time-boxed \
             work periods (like sprints) and the team id must correspond to an existing \
             team.",
            "LINEAR_GET_CYCLES_BY_TEAM_ID",
        ),
        linear::<ListStatesParams>(
            "linear_list_states",
            "Retrieves all workflow states for a specified team in linear, representing \
             the stages an issue progresses through in that team's workflow.",
            "LINEAR_LIST_LINEAR_STATES",
        ),
        linear::<ListTeamsParams>(
            "linear_list_teams",
            "Retrieves all teams, including their members, and filters each team's \
             associated projects by the provided project id.",
            "LINEAR_LIST_LINEAR_TEAMS",
        ),
        linear::<EmptyParams>(
            "linear_list_projects",
            "Retrieves all projects from the linear account.",
            "LINEAR_LIST_LINEAR_PROJECTS",
        ),
        linear::<ListUsersParams>(
            "linear_list_users",
            "Lists all users in the linear workspace with their ids, names, emails, and \
             active status.",
            "LINEAR_LIST_LINEAR_USERS",
        ),
    ]
}

/// Parameters for `linear_create_issue`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateIssueParams {
    /// Project this issue will be associated with.
    pub project_id: String,
    /// Team responsible for this issue.
    pub team_id: String,
    /// Title of the new issue.
    pub title: String,
    /// Detailed description of the issue; may include markdown.
    pub description: String,
    /// User to assign to this issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// Cycle (sprint) to assign this issue to; only applicable when the team
    /// has the cycles feature enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_id: Option<String>,
    /// Target completion date in `YYYY,MM,DD,hh,mm,ss` format, for example
    /// `2024,10,27,12,58,00`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Estimated effort as a point value on the team's scale; 0 means no
    /// estimate.
    #[serde(default)]
    pub estimate: u32,
    /// Labels to add to this issue.
    #[serde(default)]
    pub label_ids: Vec<String>,
    /// Existing issue to set as the parent, creating a sub-issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Priority: 0 (No), 1 (Urgent), 2 (High), 3 (Normal), 4 (Low).
    #[serde(default)]
    pub priority: u8,
    /// Workflow state to assign, for example backlog or in progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_id: Option<String>,
}

/// Parameters for `linear_update_issue`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateIssueParams {
    /// Issue to update.
    pub issue_id: String,
    /// User to assign to the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// New markdown description for the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New due date in `YYYY,MM,DD,hh,mm,ss` format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// New time estimate in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<u32>,
    /// Labels to set; replaces all existing labels and an empty list removes
    /// them all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_ids: Option<Vec<String>>,
    /// Existing issue to set as parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Priority: 0 (No), 1 (Urgent), 2 (High), 3 (Normal), 4 (Low).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
    /// Project to associate with the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    /// New workflow state, for example To Do or Done.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_id: Option<String>,
    /// Team to associate with the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// New title for the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Parameters for `linear_create_comment`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateCommentParams {
    /// Issue the comment lands on.
    pub issue_id: String,
    /// Non-empty comment content, in plain text or markdown.
    pub body: String,
}

/// Parameters for `linear_list_issues`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListIssuesParams {
    /// Pagination cursor; use `endCursor` from the previous response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Only return issues assigned to this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// Number of issues to return, between 1 and 250.
    #[serde(default = "default_issue_page")]
    pub first: u32,
    /// Only return issues belonging to this project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

fn default_issue_page() -> u32 {
    10
}

/// Parameters for `linear_get_cycles_by_team_id`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetCyclesByTeamParams {
    /// The team's unique identifier.
    pub team_id: String,
}

/// Parameters for `linear_list_states`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListStatesParams {
    /// Unique identifier of the team.
    pub team_id: String,
}

/// Parameters for `linear_list_teams`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListTeamsParams {
    /// Project id used to filter each team's associated projects; teams not
    /// linked to it report an empty project list.
    pub project_id: String,
}

/// Parameters for `linear_list_users`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListUsersParams {
    /// Pagination cursor; use `endCursor` from the previous response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Number of users to return, between 1 and 250.
    #[serde(default = "default_user_page")]
    pub first: u32,
}

fn default_user_page() -> u32 {
    50
}
