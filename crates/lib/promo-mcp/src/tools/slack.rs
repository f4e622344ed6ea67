//! Slack tools bridged through the Composio relay of the Promo Studio web API.

use promo_core::gate::ToolGroup;
use rmcp::schemars;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::ToolDescriptor;
use crate::helpers;

const SERVICE: &str = "Slack";
const GROUPS: &[ToolGroup] = &[ToolGroup::Slack];

fn slack<P>(name: &'static str, description: &'static str, slug: &'static str) -> ToolDescriptor
where
    P: Serialize + DeserializeOwned + schemars::JsonSchema + Send + Sync + 'static,
{
    helpers::composio_descriptor::<P>(name, description, GROUPS, SERVICE, slug)
}

pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        slack::<ConversationHistoryParams>(
            "slack_fetch_conversation_history",
            "Fetches a chronological list of messages and events from a specified slack \
             conversation, accessible by the authenticated user/bot, with options for \
             pagination and time range filtering.",
            "SLACK_FETCH_CONVERSATION_HISTORY",
        ),
        slack::<ListChannelsParams>(
            "slack_list_all_slack_team_channels",
            "Retrieves public channels, private channels, multi-person direct messages \
             (mpims), and direct messages (ims) from a slack workspace, with options to \
             filter by type and exclude archived channels.",
            "SLACK_LIST_ALL_SLACK_TEAM_CHANNELS_WITH_VARIOUS_FILTERS",
        ),
        slack::<SearchMessagesParams>(
            "slack_search_for_messages_with_query",
            "Searches messages in a slack workspace using a query with optional modifiers \
             (e.g., `in:`, `from:`, `has:`, `before:`) across accessible channels, dms, and \
             private groups.",
            "SLACK_SEARCH_FOR_MESSAGES_WITH_QUERY",
        ),
        slack::<SendMessageParams>(
            "slack_sends_a_message_to_a_slack_channel",
            "Posts a message to a slack channel, direct message, or private group; requires \
             content via `text`, `blocks`, or `attachments`.",
            "SLACK_SENDS_A_MESSAGE_TO_A_SLACK_CHANNEL",
        ),
        slack::<UpdateMessageParams>(
            "slack_updates_a_slack_message",
            "Updates a slack message, identified by `channel` id and `ts` timestamp, by \
             modifying its `text`, `attachments`, or `blocks`; provide at least one content \
             field, noting `attachments`/`blocks` are replaced if included (`[]` clears \
             them).",
            "SLACK_UPDATES_A_SLACK_MESSAGE",
        ),
    ]
}

/// Parameters for `slack_fetch_conversation_history`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ConversationHistoryParams {
    /// ID of the public channel, private channel, direct message or
    /// multi-person direct message to fetch history from.
    pub channel: String,
    /// Pagination cursor from `next_cursor` of a previous response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Include messages with `latest` or `oldest` timestamps in the results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusive: Option<bool>,
    /// End of the time range, as a Unix or Slack timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
    /// Maximum number of messages per page, between 1 and 1000.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Start of the time range, as a Unix or Slack timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest: Option<String>,
}

/// Parameters for `slack_list_all_slack_team_channels`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListChannelsParams {
    /// Case-insensitive partial match on channel names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    /// Pagination cursor from a previous response; omit for the first page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Excludes archived channels when true; the API includes them by
    /// default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_archived: Option<bool>,
    /// Maximum number of channels per page, between 1 and 1000.
    #[serde(default = "default_channel_limit")]
    pub limit: u32,
    /// Comma-separated channel types: `public_channel`, `private_channel`,
    /// `mpim`, `im`. The API defaults to `public_channel`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
}

fn default_channel_limit() -> u32 {
    1
}

/// Parameters for `slack_search_for_messages_with_query`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchMessagesParams {
    /// Search query, supporting modifiers like `in:#channel`, `from:@user`
    /// or `before:YYYY-MM-DD`.
    pub query: String,
    /// Number of messages per page, at most 100.
    #[serde(default = "default_search_count")]
    pub count: u32,
    /// Highlight search terms in results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
    /// Page number of results to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Sort by `score` (relevance) or `timestamp` (chronological).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Sort direction, `asc` or `desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_dir: Option<String>,
}

fn default_search_count() -> u32 {
    1
}

/// Parameters for `slack_sends_a_message_to_a_slack_channel`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SendMessageParams {
    /// Channel ID or name to send to, for example `C1234567890`,
    /// `D01234567` or `#general`.
    pub channel: String,
    /// Post as the authenticated user instead of as a bot; when true the
    /// bot appearance fields are ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_user: Option<bool>,
    /// URL-encoded JSON array of legacy message attachments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<String>,
    /// URL-encoded JSON array of Block Kit layout blocks, the preferred way
    /// to build rich messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<String>,
    /// Emoji for the bot icon, for example `:robot_face:`; overrides
    /// `icon_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    /// HTTPS image URL for the bot icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Automatically hyperlink channel names and usernames in the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_names: Option<bool>,
    /// Disable Slack markdown for `text` when false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mrkdwn: Option<bool>,
    /// Text parsing behavior, `none` or `full`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    /// Also post a threaded reply to the main channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_broadcast: Option<bool>,
    /// Message text; required unless `blocks` or `attachments` is provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Timestamp of the parent message to reply in a thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    /// Enable automatic link unfurling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
    /// Enable automatic media unfurling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_media: Option<bool>,
    /// Bot username displayed in messages when `as_user` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Parameters for `slack_updates_a_slack_message`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateMessageParams {
    /// ID of the channel containing the message.
    pub channel: String,
    /// Timestamp of the message to update, for example `1234567890.123456`.
    pub ts: String,
    /// Set to `"true"` to update as the authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_user: Option<String>,
    /// URL-encoded JSON array of attachments; `[]` clears them, omitting the
    /// field leaves them untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<String>,
    /// URL-encoded JSON array of layout blocks; `[]` clears them, omitting
    /// the field leaves them untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<String>,
    /// Set to `"true"` to link channel and user names in the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_names: Option<String>,
    /// Parse mode for the text, `full` or `none`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    /// New message text; not required if `blocks` or `attachments` is
    /// provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn five_slack_tools_register_in_order() {
        let tools = tools();
        let names: Vec<&str> = tools.iter().map(crate::catalog::ToolDescriptor::name).collect();
        assert_eq!(
            names,
            [
                "slack_fetch_conversation_history",
                "slack_list_all_slack_team_channels",
                "slack_search_for_messages_with_query",
                "slack_sends_a_message_to_a_slack_channel",
                "slack_updates_a_slack_message",
            ]
        );
        for tool in &tools {
            assert_eq!(tool.groups(), GROUPS);
        }
    }

    #[test]
    fn channel_list_limit_defaults_to_one() {
        let params: ListChannelsParams =
            serde_json::from_value(json!({})).expect("empty channel list params should deserialize");
        assert_eq!(params.limit, 1);

        let wire = serde_json::to_value(&params).expect("channel list params should serialize");
        assert_eq!(wire["limit"], 1);
        assert!(wire.get("channel_name").is_none());
        assert!(wire.get("types").is_none());
    }

    #[test]
    fn search_count_defaults_to_one() {
        let params: SearchMessagesParams =
            serde_json::from_value(json!({ "query": "in:#general launch" }))
                .expect("minimal search params should deserialize");
        assert_eq!(params.count, 1);
        assert!(params.page.is_none());
    }

    #[test]
    fn unset_message_options_stay_off_the_wire() {
        let params: SendMessageParams =
            serde_json::from_value(json!({ "channel": "#general", "text": "hello" }))
                .expect("minimal send params should deserialize");

        let wire = serde_json::to_value(&params).expect("send params should serialize");
        let fields = wire.as_object().expect("send params should serialize to an object");
        assert_eq!(fields.len(), 2);
        assert_eq!(wire["channel"], "#general");
        assert_eq!(wire["text"], "hello");
    }
}
