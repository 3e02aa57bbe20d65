use blogrank_core::{FetchError, PostSummary, RawPost};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

const MOBILE_BLOG_BASE: &str = "https://m.blog.naver.com";

static OG_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+property="og:title"\s+content="([^"]*)""#).unwrap()
});

static SCRIPT_OR_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap());

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static HASHTAG_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="[^"]*__se-hash-tag[^"]*"[^>]*>\s*#?([0-9A-Za-z_가-힣]+)"#).unwrap()
});

/// Fetches post documents and recent-post listings from the mobile blog
/// surface. Fetch failures are fatal for the affected post.
#[derive(Debug)]
pub struct BlogFetcher {
    http_client: Client,
}

impl BlogFetcher {
    pub fn new(timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { http_client }
    }

    pub async fn fetch_post(&self, url: &str) -> Result<RawPost, FetchError> {
        let (blog_id, log_no) = parse_blog_url(url)?;
        let document_url = format!("{}/{}/{}", MOBILE_BLOG_BASE, blog_id, log_no);

        debug!("Fetching post document: {}", document_url);
        let response = self
            .http_client
            .get(&document_url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::RequestTimeout
                } else {
                    FetchError::DocumentUnavailable {
                        details: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(FetchError::DocumentUnavailable {
                details: format!("HTTP {}", response.status()),
            });
        }

        let document = response
            .text()
            .await
            .map_err(|e| FetchError::DocumentUnavailable {
                details: e.to_string(),
            })?;

        let title = OG_TITLE
            .captures(&document)
            .map(|capture| decode_entities(&capture[1]))
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| FetchError::ParseFailed {
                details: "post title missing from document".to_string(),
            })?;

        let content = document_text(&document);
        let hashtags = markup_hashtags(&document);

        info!(
            "Fetched post '{}' from blog {} ({} chars, {} markup tags)",
            title,
            blog_id,
            content.chars().count(),
            hashtags.len()
        );

        Ok(RawPost {
            title,
            content,
            hashtags,
            blog_id,
            url: url.to_string(),
        })
    }

    /// Recent posts of a blog, newest first. An empty list means there is
    /// nothing to analyze and is not an error.
    pub async fn list_recent(
        &self,
        blog_id: &str,
        count: u32,
    ) -> Result<Vec<PostSummary>, FetchError> {
        let listing_url = format!("{}/api/blogs/{}/post-list", MOBILE_BLOG_BASE, blog_id);
        let count_param = count.to_string();

        debug!("Fetching recent posts for blog {}", blog_id);
        let response = self
            .http_client
            .get(&listing_url)
            .query(&[
                ("categoryNo", "0"),
                ("itemCount", count_param.as_str()),
                ("page", "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::RequestTimeout
                } else {
                    FetchError::DocumentUnavailable {
                        details: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(FetchError::DocumentUnavailable {
                details: format!("HTTP {}", response.status()),
            });
        }

        let listing: PostListResponse =
            response.json().await.map_err(|e| FetchError::ParseFailed {
                details: format!("post list unparseable: {}", e),
            })?;

        let summaries: Vec<PostSummary> = listing
            .result
            .items
            .into_iter()
            .map(|item| PostSummary {
                title: decode_entities(item.display_title()),
                link: format!("https://blog.naver.com/{}/{}", blog_id, item.log_no),
            })
            .collect();

        if summaries.is_empty() {
            warn!("Blog {} returned no recent posts", blog_id);
        }
        Ok(summaries)
    }
}

#[derive(Debug, Deserialize)]
struct PostListResponse {
    #[serde(default)]
    result: PostListResult,
}

#[derive(Debug, Default, Deserialize)]
struct PostListResult {
    #[serde(default)]
    items: Vec<PostListItem>,
}

#[derive(Debug, Deserialize)]
struct PostListItem {
    #[serde(rename = "logNo", default)]
    log_no: u64,
    #[serde(default)]
    title: String,
    #[serde(rename = "titleWithInspectMessage", default)]
    title_with_inspect_message: String,
}

impl PostListItem {
    fn display_title(&self) -> &str {
        if !self.title_with_inspect_message.is_empty() {
            &self.title_with_inspect_message
        } else {
            &self.title
        }
    }
}

/// Extracts `(blog_id, log_no)` from the supported post URL shapes:
/// `blog.naver.com/{id}/{logNo}`, the mobile equivalent, and the legacy
/// `PostView` form with query parameters.
pub fn parse_blog_url(raw: &str) -> Result<(String, String), FetchError> {
    let unrecognized = || FetchError::UnrecognizedUrl {
        url: raw.to_string(),
    };

    let parsed = url::Url::parse(raw).map_err(|_| unrecognized())?;
    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    if host != "blog.naver.com" && !host.ends_with(".blog.naver.com") {
        return Err(unrecognized());
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    // Legacy PostView form carries the ids in the query string.
    if segments
        .first()
        .map_or(false, |s| s.starts_with("PostView"))
    {
        let mut blog_id = None;
        let mut log_no = None;
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "blogId" => blog_id = Some(value.to_string()),
                "logNo" => log_no = Some(value.to_string()),
                _ => {}
            }
        }
        return match (blog_id, log_no) {
            (Some(blog_id), Some(log_no)) => Ok((blog_id, log_no)),
            _ => Err(unrecognized()),
        };
    }

    match segments.as_slice() {
        [blog_id, log_no] if log_no.chars().all(|c| c.is_ascii_digit()) => {
            Ok((blog_id.to_string(), log_no.to_string()))
        }
        _ => Err(unrecognized()),
    }
}

/// Plain text of a post document: script/style blocks removed, markup
/// replaced with spaces, entities decoded, whitespace collapsed.
pub fn document_text(document: &str) -> String {
    let without_blocks = SCRIPT_OR_STYLE.replace_all(document, " ");
    let without_markup = MARKUP_TAG.replace_all(&without_blocks, " ");
    let decoded = decode_entities(&without_markup);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Author tags present in the document markup, marker stripped, first
/// occurrence kept.
pub fn markup_hashtags(document: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for capture in HASHTAG_SPAN.captures_iter(document) {
        let tag = capture[1].to_string();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_desktop_post_url() {
        let (blog_id, log_no) =
            parse_blog_url("https://blog.naver.com/myblog/223000000001").unwrap();
        assert_eq!(blog_id, "myblog");
        assert_eq!(log_no, "223000000001");
    }

    #[test]
    fn test_parse_mobile_post_url() {
        let (blog_id, log_no) =
            parse_blog_url("https://m.blog.naver.com/myblog/223000000001").unwrap();
        assert_eq!(blog_id, "myblog");
        assert_eq!(log_no, "223000000001");
    }

    #[test]
    fn test_parse_legacy_postview_url() {
        let (blog_id, log_no) = parse_blog_url(
            "https://blog.naver.com/PostView.naver?blogId=myblog&logNo=223000000001",
        )
        .unwrap();
        assert_eq!(blog_id, "myblog");
        assert_eq!(log_no, "223000000001");
    }

    #[test]
    fn test_parse_rejects_foreign_hosts() {
        assert!(parse_blog_url("https://example.com/myblog/1").is_err());
        assert!(parse_blog_url("not a url").is_err());
    }

    #[test]
    fn test_document_text_strips_markup_and_scripts() {
        let document = concat!(
            "<html><head><script>var x = 1;</script></head>",
            "<body><p>강남 맛집</p><div>후기 &amp; 사진</div></body></html>"
        );
        assert_eq!(document_text(document), "강남 맛집 후기 & 사진");
    }

    #[test]
    fn test_markup_hashtags_dedup() {
        let document = concat!(
            r#"<span class="__se-hash-tag">#봄나들이</span>"#,
            r#"<span class="__se-hash-tag">#봄나들이</span>"#,
            r#"<span class="__se-hash-tag">#데일리룩</span>"#,
        );
        assert_eq!(
            markup_hashtags(document),
            vec!["봄나들이".to_string(), "데일리룩".to_string()]
        );
    }
}
