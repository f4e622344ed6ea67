//! Notion tools bridged through the Composio relay of the Promo Studio web API.
//!
//! Every tool forwards its parameters verbatim to the named Composio slug and
//! returns the relay response as pretty JSON, so the parameter types here
//! mirror the Notion API shapes instead of inventing local ones.

use promo_core::gate::ToolGroup;
use rmcp::model::JsonObject;
use rmcp::schemars;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::ToolDescriptor;
use crate::helpers;

const SERVICE: &str = "Notion";
const GROUPS: &[ToolGroup] = &[ToolGroup::Notion];

fn notion<P>(name: &'static str, description: &'static str, slug: &'static str) -> ToolDescriptor
where
    P: Serialize + DeserializeOwned + schemars::JsonSchema + Send + Sync + 'static,
{
    helpers::composio_descriptor::<P>(name, description, GROUPS, SERVICE, slug)
}

#[allow(clippy::too_many_lines)]
pub fn tools() -> Vec<ToolDescriptor> {
    vec![
        notion::<FetchDataParams>(
            "notion_fetch_data",
            "Fetches notion items (pages and/or databases) from the notion workspace, always \
             call this action to get page id or database id in the simplest way",
            "NOTION_FETCH_DATA",
        ),
        notion::<CreateCommentParams>(
            "notion_create_comment",
            "Adds a comment to a notion page (via `parent page id`) or to an existing \
             discussion thread (via `discussion id`); cannot create new discussion threads \
             on specific blocks (inline comments).",
            "NOTION_CREATE_COMMENT",
        ),
        notion::<CreateDatabaseParams>(
            "notion_create_database",
            "Creates a new notion database as a subpage under a specified parent page with a \
             defined properties schema; use this action exclusively for creating new \
             databases.",
            "NOTION_CREATE_DATABASE",
        ),
        notion::<CreatePageParams>(
            "notion_create_notion_page",
            "Creates a new empty page in a notion workspace.",
            "NOTION_CREATE_NOTION_PAGE",
        ),
        notion::<FetchDatabaseParams>(
            "notion_fetch_database",
            "Fetches a notion database's structural metadata (properties, title, etc.) via \
             its `database id`, not the data entries; `database id` must reference an \
             existing database.",
            "NOTION_FETCH_DATABASE",
        ),
        notion::<FetchRowParams>(
            "notion_fetch_row",
            "Retrieves a notion database row's properties and metadata; use a different \
             action for page content blocks.",
            "NOTION_FETCH_ROW",
        ),
        notion::<InsertRowParams>(
            "notion_insert_row_database",
            "Creates a new page (row) in a specified notion database.",
            "NOTION_INSERT_ROW_DATABASE",
        ),
        notion::<QueryDatabaseParams>(
            "notion_query_database",
            "Queries a notion database for pages (rows), where rows are pages and columns \
             are properties; ensure sort property names correspond to existing database \
             properties.",
            "NOTION_QUERY_DATABASE",
        ),
        notion::<RetrievePropertyParams>(
            "notion_retrieve_database_property",
            "Tool to retrieve a specific property object of a notion database. use when you \
             need to get details about a single database column/property.",
            "NOTION_RETRIEVE_DATABASE_PROPERTY",
        ),
        notion::<UpdatePageParams>(
            "notion_update_page",
            "Tool to update the properties, icon, cover, or archive status of a page. use \
             when you need to modify existing page attributes.",
            "NOTION_UPDATE_PAGE",
        ),
        notion::<UpdateRowParams>(
            "notion_update_row_database",
            "Updates or archives an existing notion database row (page) using its `row id`, \
             allowing modification of its icon, cover, and/or properties; ensure the target \
             page is accessible and property details (names/ids and values) align with the \
             database schema and specified formats.",
            "NOTION_UPDATE_ROW_DATABASE",
        ),
        notion::<UpdateSchemaParams>(
            "notion_update_schema_database",
            "Updates an existing notion database's title, description, and/or properties; \
             at least one of these attributes must be provided to effect a change.",
            "NOTION_UPDATE_SCHEMA_DATABASE",
        ),
        notion::<AppendBlockChildrenParams>(
            "notion_append_block_children",
            "Appends new child blocks to a specified parent block or page in Notion, ideal \
             for adding content within an existing structure (e.g., list items, toggle \
             content) rather than creating new pages; the parent must be able to accept \
             children. Blocks can be parented by other blocks, pages, or databases. Up to \
             100 block children can be appended in a single request.",
            "NOTION_APPEND_BLOCK_CHILDREN",
        ),
        notion::<FetchBlockParams>(
            "notion_fetch_notion_block",
            "Retrieves a notion block (or page, as pages are blocks) using its valid uuid; \
             if the block has children, use a separate action to fetch them.",
            "NOTION_FETCH_NOTION_BLOCK",
        ),
        notion::<FetchChildBlocksParams>(
            "notion_fetch_notion_child_block",
            "Retrieves a paginated list of direct, first-level child block objects for a \
             given parent notion block or page id; use block ids from the response for \
             subsequent calls to access deeply nested content.",
            "NOTION_FETCH_NOTION_CHILD_BLOCK",
        ),
        notion::<UpdateBlockParams>(
            "notion_notion_update_block",
            "Updates an existing notion block's textual content or type-specific properties \
             (e.g., 'checked' status, 'color'), using its `block id` and the specified \
             `block type`.",
            "NOTION_NOTION_UPDATE_BLOCK",
        ),
        notion::<SearchPagesParams>(
            "notion_search_notion_page",
            "Searches notion pages and databases by title; an empty query lists all \
             accessible items, useful for discovering ids or as a fallback when a specific \
             query yields no results.",
            "NOTION_SEARCH_NOTION_PAGE",
        ),
    ]
}

/// Simplified rich text input used where a single styled span is enough.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[allow(clippy::struct_excessive_bools)]
pub struct RichTextInput {
    /// Target block variant for the new content.
    ///
    /// One of `paragraph`, `heading_1`, `heading_2`, `heading_3`, `callout`,
    /// `to_do`, `toggle`, `quote`, `bulleted_list_item` or
    /// `numbered_list_item`; `file`, `image` and `video` require `link`.
    #[serde(default = "default_block_property")]
    pub block_property: String,
    /// Textual content of the span.
    pub content: String,
    /// URL for hyperlinks or for the `file`, `image` and `video` variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub code: bool,
    /// Color of the text or its background.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_block_property() -> String {
    "paragraph".to_string()
}

fn default_color() -> String {
    "default".to_string()
}

/// A rich text object in the full Notion API shape.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RichText {
    /// Always `text`.
    #[serde(rename = "type", default = "default_text_kind")]
    pub kind: String,
    pub text: TextPayload,
    /// Formatting annotations; omit for plain text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

fn default_text_kind() -> String {
    "text".to_string()
}

/// Text content with an optional hyperlink.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TextPayload {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<TextLink>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TextLink {
    pub url: String,
}

/// Styling flags for a rich text span.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
#[allow(clippy::struct_excessive_bools)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

/// A full Notion API block object.
///
/// The variant payload rides alongside `object` and `type` keyed by the block
/// type, exactly as the Notion API expects, so nested structures like
/// `rich_text` arrays and child blocks pass through untouched.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Block {
    /// Always `block`.
    #[serde(default = "default_block_object")]
    pub object: String,
    /// Block variant, for example `paragraph`, `heading_2`, `to_do`, `code`,
    /// `image`, `bookmark`, `equation` or `link_to_page`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Variant payload keyed by the block type, carrying fields such as
    /// `rich_text`, `color`, `checked`, `url` and `children`.
    #[serde(flatten)]
    pub payload: JsonObject,
}

fn default_block_object() -> String {
    "block".to_string()
}

/// External file reference.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ExternalFile {
    pub url: String,
}

/// Notion-hosted file reference.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HostedFile {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

/// Page cover object; only external files are supported.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageCover {
    /// Always `external`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalFile>,
}

/// Page or callout icon: an emoji, an external image or a hosted file.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageIcon {
    /// `emoji`, `external` or `file`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<HostedFile>,
}

/// Column definition for database creation.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PropertySchema {
    /// Name of the property.
    pub name: String,
    /// Property type.
    ///
    /// One of `title`, `rich_text`, `number`, `select`, `multi_select`,
    /// `date`, `people`, `files`, `checkbox`, `url`, `email`, `phone_number`,
    /// `formula`, `relation`, `rollup`, `status`, `created_time`,
    /// `created_by`, `last_edited_time` or `last_edited_by`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A property value for inserting or updating database rows.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PropertyValue {
    /// Name of the property as it appears in Notion.
    pub name: String,
    /// Property type the value is formatted for.
    #[serde(rename = "type")]
    pub kind: String,
    /// Value rendered as a string, formatted for the property type.
    ///
    /// `title` and `rich_text` take plain text (max 2000 characters),
    /// `number` takes text like `"23.4"`, `select` an option name,
    /// `multi_select` comma separated names, `date` ISO 8601, `people` and
    /// `relation` comma separated ids, `checkbox` `"True"` or `"False"`,
    /// `url` a URL and `files` comma separated URLs.
    pub value: String,
}

/// Sort rule for database queries.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct QuerySort {
    /// Database column to sort by.
    pub property_name: String,
    /// True sorts ascending, false descending.
    pub ascending: bool,
}

/// A single schema change for `notion_update_schema_database`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PropertyUpdate {
    /// Name of the column to change.
    pub name: String,
    /// New property type; leave unset to keep the current type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_type: Option<String>,
    /// Remove the property entirely.
    #[serde(default)]
    pub remove: bool,
    /// New name for the column; leave unset to keep the current name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
}

/// Type-specific extras merged into a block update.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BlockExtras {
    /// Text or background color, for example `blue` or `red_background`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Whether heading blocks are toggleable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_toggleable: Option<bool>,
    /// Whether to-do items are checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Syntax highlighting language for code blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Icon for callout blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<PageIcon>,
    /// Caption for media blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<Vec<RichText>>,
    /// URL for bookmark or embed blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// LaTeX expression for equation blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Target page for `link_to_page` blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    /// Target database for `link_to_page` blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
}

/// Parameters for `notion_fetch_data`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FetchDataParams {
    /// Fetch both pages and databases. Only one of `get_all`, `get_pages` or
    /// `get_databases` may be true.
    #[serde(default)]
    pub get_all: bool,
    /// Fetch all databases accessible to the integration.
    #[serde(default)]
    pub get_databases: bool,
    /// Fetch all pages accessible to the integration.
    #[serde(default)]
    pub get_pages: bool,
    /// Maximum number of items to retrieve, between 1 and 100.
    #[serde(default = "default_fetch_page_size")]
    pub page_size: u32,
    /// Optional title or content filter; unset returns every accessible item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

fn default_fetch_page_size() -> u32 {
    100
}

/// Parameters for `notion_create_comment`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateCommentParams {
    /// Comment content; the simplest form is `{ "content": "Looks good!" }`.
    pub comment: RichTextInput,
    /// Existing discussion thread to append to. Required when
    /// `parent_page_id` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<String>,
    /// Page to comment on. Required when `discussion_id` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_page_id: Option<String>,
}

/// Parameters for `notion_create_database`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateDatabaseParams {
    /// UUID of the page that will contain the new database.
    pub parent_id: String,
    /// Title for the new database.
    pub title: String,
    /// Column definitions; at least one `title` property is required.
    pub properties: Vec<PropertySchema>,
}

/// Parameters for `notion_create_notion_page`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreatePageParams {
    /// UUID of the parent page or database for the new page.
    pub parent_id: String,
    pub title: String,
    /// Publicly accessible image URL for the page cover.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Single emoji character for the page icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Parameters for `notion_fetch_database`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FetchDatabaseParams {
    /// Identifier of the database; linked databases are not supported.
    pub database_id: String,
}

/// Parameters for `notion_fetch_row`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FetchRowParams {
    /// UUID of the page that represents the database row.
    pub page_id: String,
}

/// Parameters for `notion_insert_row_database`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct InsertRowParams {
    /// Database that receives the new row.
    pub database_id: String,
    /// Property values for the new row as a list, not a map. Omitted
    /// properties are initialized empty.
    #[serde(default)]
    pub properties: Vec<PropertyValue>,
    /// Content blocks appended to the body of the new page.
    #[serde(default)]
    pub child_blocks: Vec<RichText>,
    /// Publicly accessible image URL for the page cover.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Single emoji character for the page icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Parameters for `notion_query_database`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct QueryDatabaseParams {
    pub database_id: String,
    /// Maximum number of rows per response.
    #[serde(default = "default_query_page_size")]
    pub page_size: u32,
    /// Sort rules applied in order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<QuerySort>>,
    /// Cursor from a previous response; unset starts from the beginning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

fn default_query_page_size() -> u32 {
    2
}

/// Parameters for `notion_retrieve_database_property`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RetrievePropertyParams {
    pub database_id: String,
    /// Property id or property name.
    pub property_id: String,
}

/// Parameters for `notion_update_page`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdatePageParams {
    pub page_id: String,
    /// True sends the page to trash, false restores it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<PageCover>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<PageIcon>,
    /// Property values to update keyed by property name or id; properties
    /// not listed keep their values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<JsonObject>,
}

/// Parameters for `notion_update_row_database`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateRowParams {
    /// UUID of the row (page) to update.
    pub row_id: String,
    /// Property values to change; properties not listed keep their values.
    #[serde(default)]
    pub properties: Vec<PropertyValue>,
    /// URL of an external cover image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    /// Single emoji character for the page icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Archive the row instead of updating it.
    #[serde(default)]
    pub delete_row: bool,
}

/// Parameters for `notion_update_schema_database`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateSchemaParams {
    pub database_id: String,
    /// New database title; unset keeps the current one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New database description; unset keeps the current one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column changes; each entry names a column plus one of `new_type`,
    /// `rename` or `remove`.
    #[serde(default)]
    pub properties: Vec<PropertyUpdate>,
}

/// Parameters for `notion_append_block_children`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AppendBlockChildrenParams {
    /// Parent block or page that receives the children.
    pub block_id: String,
    /// Blocks to append, up to 100 per request with two levels of nesting.
    pub children: Vec<Block>,
    /// Existing child block to insert after; unset appends at the end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Parameters for `notion_fetch_notion_block`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FetchBlockParams {
    /// UUID of the block or page to retrieve.
    pub block_id: String,
}

/// Parameters for `notion_fetch_notion_child_block`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct FetchChildBlocksParams {
    /// UUID of the parent block or page.
    pub block_id: String,
    /// Maximum child blocks per response, capped at 100 by Notion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// Cursor from a previous response for pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

/// Parameters for `notion_notion_update_block`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateBlockParams {
    /// Identifier of the block to update.
    pub block_id: String,
    /// Block type being updated.
    ///
    /// One of `paragraph`, `heading_1`, `heading_2`, `heading_3`,
    /// `bulleted_list_item`, `numbered_list_item`, `to_do` or `toggle`.
    pub block_type: String,
    /// New text content for the block.
    pub content: String,
    /// Extras merged into the block type payload, for example `checked` for
    /// to-dos or `color` for paragraphs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<BlockExtras>,
}

/// Parameters for `notion_search_notion_page`.
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchPagesParams {
    /// Title text to search for; empty lists every accessible item.
    #[serde(default)]
    pub query: String,
    /// Only `object` is supported.
    #[serde(default = "default_filter_property")]
    pub filter_property: String,
    /// `page` or `database`.
    #[serde(default = "default_filter_value")]
    pub filter_value: String,
    /// Number of items per response, between 1 and 100.
    #[serde(default = "default_query_page_size")]
    pub page_size: u32,
    /// Cursor from a previous response for pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    /// Only `last_edited_time` is supported; requires `direction`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// `ascending` or `descending`; required when `timestamp` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

fn default_filter_property() -> String {
    "object".to_string()
}

fn default_filter_value() -> String {
    "page".to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn seventeen_notion_tools_register_in_order() {
        let tools = tools();
        let names: Vec<&str> = tools.iter().map(crate::catalog::ToolDescriptor::name).collect();
        assert_eq!(
            names,
            [
                "notion_fetch_data",
                "notion_create_comment",
                "notion_create_database",
                "notion_create_notion_page",
                "notion_fetch_database",
                "notion_fetch_row",
                "notion_insert_row_database",
                "notion_query_database",
                "notion_retrieve_database_property",
                "notion_update_page",
                "notion_update_row_database",
                "notion_update_schema_database",
                "notion_append_block_children",
                "notion_fetch_notion_block",
                "notion_fetch_notion_child_block",
                "notion_notion_update_block",
                "notion_search_notion_page",
            ]
        );
        for tool in &tools {
            assert_eq!(tool.groups(), GROUPS);
        }
    }

    #[test]
    fn fetch_defaults_materialize_on_the_wire() {
        let params: FetchDataParams =
            serde_json::from_value(json!({})).expect("empty fetch params should deserialize");
        assert_eq!(params.page_size, 100);
        assert!(!params.get_all);

        let wire = serde_json::to_value(&params).expect("fetch params should serialize");
        assert_eq!(wire["page_size"], 100);
        assert_eq!(wire["get_pages"], false);
        assert!(wire.get("query").is_none());
    }

    #[test]
    fn query_page_size_defaults_to_two() {
        let params: QueryDatabaseParams = serde_json::from_value(json!({ "database_id": "db-1" }))
            .expect("minimal query params should deserialize");
        assert_eq!(params.page_size, 2);

        let wire = serde_json::to_value(&params).expect("query params should serialize");
        assert_eq!(wire["page_size"], 2);
        assert!(wire.get("sorts").is_none());
        assert!(wire.get("start_cursor").is_none());
    }

    #[test]
    fn blocks_carry_their_variant_payload_through() {
        let block: Block = serde_json::from_value(json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": { "rich_text": [], "color": "default" }
        }))
        .expect("paragraph block should deserialize");
        assert_eq!(block.kind, "paragraph");

        let wire = serde_json::to_value(&block).expect("block should serialize");
        assert_eq!(wire["type"], "paragraph");
        assert_eq!(wire["paragraph"]["color"], "default");
    }

    #[test]
    fn comment_input_defaults_to_plain_paragraph_text() {
        let params: CreateCommentParams = serde_json::from_value(json!({
            "comment": { "content": "Looks good!" },
            "parent_page_id": "page-1"
        }))
        .expect("comment params should deserialize");
        assert_eq!(params.comment.block_property, "paragraph");
        assert_eq!(params.comment.color, "default");
        assert!(!params.comment.bold);
        assert!(params.discussion_id.is_none());
    }
}
