//! 저장소 URL을 collection/project/repository 구성요소로 해석하는 모듈.

use anyhow::{Context, Result, bail};
use percent_encoding::percent_decode_str;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub host: String,
    pub collection_name: String,
    pub collection_url: String,
    pub project_name: String,
    pub repository_name: String,
}

impl RepositoryTarget {
    /// `<base>/<collection>/<project>/_git/<repository>` 형식을 해석한다.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input)?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL host is missing"))?
            .to_string();

        let Some((before_git, after_git)) = url.path().split_once("/_git/") else {
            bail!("no valid Git repository URL: {input}");
        };

        let prefix: Vec<&str> = before_git.split('/').filter(|s| !s.is_empty()).collect();
        if prefix.len() < 2 {
            bail!(
                "no valid Git repository URL containing collection and project name: {input}"
            );
        }

        let Some(repository_name) = after_git.split('/').find(|s| !s.is_empty()) else {
            bail!("no repository name in Git repository URL: {input}");
        };

        let collection_segments = &prefix[..prefix.len() - 1];
        let collection_name = collection_segments[collection_segments.len() - 1];
        let project_name = prefix[prefix.len() - 1];

        // 원본 URL의 scheme/host/port를 유지한 채 collection 경로까지만 남긴다.
        let mut collection_url = url.clone();
        collection_url.set_query(None);
        collection_url.set_fragment(None);
        collection_url.set_path(&collection_segments.join("/"));

        Ok(Self {
            host,
            collection_name: decode_segment(collection_name)?,
            collection_url: collection_url.as_str().trim_end_matches('/').to_string(),
            project_name: decode_segment(project_name)?,
            repository_name: decode_segment(repository_name)?,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

/// `url.path()`는 인코딩된 상태이므로 이름으로 쓰기 전에 디코딩한다.
fn decode_segment(segment: &str) -> Result<String> {
    Ok(percent_decode_str(segment)
        .decode_utf8()
        .with_context(|| format!("invalid UTF-8 in URL segment: {segment}"))?
        .into_owned())
}
