//! Research tools backed by the Promo Studio web API.

use promo_core::error::ToolError;
use promo_core::gate::ToolGroup;
use rmcp::schemars;
use serde::Deserialize;

use crate::catalog::ToolDescriptor;
use crate::helpers;

const GROUPS: &[ToolGroup] = &[ToolGroup::Research];

pub fn tools() -> Vec<ToolDescriptor> {
    vec![perplexity_tool(), deep_research_tool(), reddit_tool()]
}

/// Parameters for `use_perplexity`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UsePerplexityParams {
    /// The search query or question to research.
    pub query: String,
    /// `web` or `academic`; academic prioritizes scholarly sources.
    #[serde(default = "default_search_mode")]
    pub search_mode: String,
}

fn default_search_mode() -> String {
    "web".to_string()
}

/// Parameters for `use_openai_deep_research`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeepResearchParams {
    /// The research question; it is enriched before the deep run starts.
    pub query: String,
}

/// Parameters for `fetch_reddit_posts`.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FetchRedditPostsParams {
    /// Subreddit name without the `r/` prefix.
    pub subreddit: String,
    /// Number of top posts to fetch.
    #[serde(default = "default_post_limit")]
    pub limit: u32,
}

fn default_post_limit() -> u32 {
    10
}

fn perplexity_tool() -> ToolDescriptor {
    ToolDescriptor::new::<UsePerplexityParams, _, _>(
        "use_perplexity",
        "Searches the web with Perplexity AI through the Promo Studio web API and returns \
         sourced, cited results. Requires PROMO_API_TOKEN. Use search_mode \"academic\" for \
         scholarly sources. Example: use_perplexity({ query: \"latest macOS screen capture \
         APIs\", search_mode: \"web\" })",
        GROUPS,
        |context, params: UsePerplexityParams| async move {
            let search = context
                .api
                .perplexity_search(&params.query, &params.search_mode)
                .await?;
            if !search.success {
                return Err(api_failure("Perplexity search failed", search.error));
            }
            if let Some(usage) = &search.usage {
                tracing::info!(
                    prompt = usage.prompt_tokens,
                    completion = usage.completion_tokens,
                    total = usage.total_tokens,
                    "perplexity token usage"
                );
            }

            let mut lines = vec![
                format!("# Search Results for: \"{}\"", params.query),
                String::new(),
                search.result,
                String::new(),
                "---".to_string(),
                "## Citations".to_string(),
            ];
            for (index, citation) in search.citations.iter().enumerate() {
                lines.push(format!("{}. {citation}", index + 1));
            }
            lines.push(String::new());
            lines.push("---".to_string());
            lines.push(format!(
                "*Search powered by Perplexity AI ({}) via the Promo Studio web API*",
                search.model.as_deref().unwrap_or("unknown model")
            ));
            lines.push(String::new());
            lines.push("Next steps:".to_string());
            lines.push("- Present the findings together with their citations".to_string());
            lines.push(
                "- Save them with create_research_asset({ name: \"FILE_NAME\", content: \
                 \"RESEARCH_CONTENT\" })"
                    .to_string(),
            );

            Ok(helpers::text(lines.join("\n")))
        },
    )
}

fn deep_research_tool() -> ToolDescriptor {
    ToolDescriptor::new::<DeepResearchParams, _, _>(
        "use_openai_deep_research",
        "Runs an OpenAI deep research pass through the Promo Studio web API. The query is \
         enriched server side before the research starts, so pass the user's question as is. \
         Requires PROMO_API_TOKEN; a run can take several minutes. Example: \
         use_openai_deep_research({ query: \"positioning of screen recording tools\" })",
        GROUPS,
        |context, params: DeepResearchParams| async move {
            let research = context.api.deep_research(&params.query).await?;
            if !research.success {
                return Err(api_failure("Deep research failed", research.error));
            }

            let lines = vec![
                format!("# Deep Research Results for: \"{}\"", params.query),
                String::new(),
                "## Enriched Research Instructions".to_string(),
                research.enriched_query,
                String::new(),
                "---".to_string(),
                String::new(),
                "## Research Findings".to_string(),
                research.result,
                String::new(),
                "---".to_string(),
                format!(
                    "*Deep research powered by OpenAI {} via the Promo Studio web API*",
                    research.model.as_deref().unwrap_or("unknown model")
                ),
                String::new(),
                "Next steps:".to_string(),
                "- Save the findings with create_research_asset({ name: \"FILE_NAME\", \
                 content: \"RESEARCH_CONTENT\" })"
                    .to_string(),
            ];

            Ok(helpers::text(lines.join("\n")))
        },
    )
}

fn reddit_tool() -> ToolDescriptor {
    ToolDescriptor::new::<FetchRedditPostsParams, _, _>(
        "fetch_reddit_posts",
        "Fetches the current top posts of a subreddit through the Promo Studio web API. \
         Requires PROMO_API_TOKEN. Example: fetch_reddit_posts({ subreddit: \"macapps\", \
         limit: 10 })",
        GROUPS,
        |context, params: FetchRedditPostsParams| async move {
            let posts = context
                .api
                .fetch_reddit_posts(&params.subreddit, params.limit)
                .await?;
            if !posts.success {
                return Err(api_failure("Reddit fetch failed", posts.error));
            }

            let mut lines = vec![
                format!("# Top posts from r/{}", posts.subreddit),
                String::new(),
            ];
            if posts.posts.is_empty() {
                lines.push("No posts found.".to_string());
            }
            for (index, post) in posts.posts.iter().enumerate() {
                lines.push(format!("{}. **{}** by u/{}", index + 1, post.title, post.author));
                lines.push(format!(
                    "   {} points, {} comments",
                    post.score, post.num_comments
                ));
                lines.push(format!("   {}", post.url));
                lines.push(String::new());
            }

            Ok(helpers::text(lines.join("\n")))
        },
    )
}

fn api_failure(what: &str, error: Option<String>) -> ToolError {
    ToolError::api(
        format!(
            "{what}: {}",
            error.unwrap_or_else(|| "Unknown error".to_string())
        ),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn research_tools_register_under_the_research_group() {
        let tools = tools();
        let names: Vec<&str> = tools.iter().map(crate::catalog::ToolDescriptor::name).collect();
        assert_eq!(
            names,
            ["use_perplexity", "use_openai_deep_research", "fetch_reddit_posts"]
        );
        for tool in &tools {
            assert_eq!(tool.groups(), GROUPS);
        }
    }

    #[test]
    fn search_mode_defaults_to_web() {
        let params: UsePerplexityParams =
            serde_json::from_value(serde_json::json!({ "query": "screen capture" }))
                .expect("parameters deserialize");
        assert_eq!(params.search_mode, "web");

        let params: UsePerplexityParams = serde_json::from_value(serde_json::json!({
            "query": "screen capture",
            "search_mode": "academic",
        }))
        .expect("parameters deserialize");
        assert_eq!(params.search_mode, "academic");
    }

    #[test]
    fn reddit_limit_defaults_to_ten() {
        let params: FetchRedditPostsParams =
            serde_json::from_value(serde_json::json!({ "subreddit": "macapps" }))
                .expect("parameters deserialize");
        assert_eq!(params.limit, 10);
    }

    #[test]
    fn api_failures_name_the_operation() {
        let err = api_failure("Perplexity search failed", Some("quota exceeded".to_string()));
        assert_eq!(err.to_string(), "Perplexity search failed: quota exceeded");

        let err = api_failure("Reddit fetch failed", None);
        assert_eq!(err.to_string(), "Reddit fetch failed: Unknown error");
    }
}
