//! 호스팅 서비스 인증 방식(닫힌 variant 집합).

use anyhow::{Result, bail};

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// 통합(NTLM) 인증. 온프레미스 서버 전용.
    Integrated,
    Basic { user_name: String, password: String },
    PersonalAccessToken(String),
    OAuth(String),
    AzureActiveDirectory { user_name: String, password: String },
}

impl Credentials {
    pub fn basic(user_name: &str, password: &str) -> Result<Self> {
        Ok(Self::Basic {
            user_name: require("user name", user_name)?,
            password: require("password", password)?,
        })
    }

    pub fn personal_access_token(token: &str) -> Result<Self> {
        Ok(Self::PersonalAccessToken(require(
            "personal access token",
            token,
        )?))
    }

    pub fn oauth(access_token: &str) -> Result<Self> {
        Ok(Self::OAuth(require("access token", access_token)?))
    }

    pub fn azure_active_directory(user_name: &str, password: &str) -> Result<Self> {
        Ok(Self::AzureActiveDirectory {
            user_name: require("user name", user_name)?,
            password: require("password", password)?,
        })
    }

    /// inspection 출력용 코드값.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Integrated => "integrated",
            Self::Basic { .. } => "basic",
            Self::PersonalAccessToken(_) => "pat",
            Self::OAuth(_) => "oauth",
            Self::AzureActiveDirectory { .. } => "aad",
        }
    }
}

impl std::fmt::Debug for Credentials {
    // 비밀값이 로그에 남지 않도록 종류만 출력한다.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credentials({})", self.kind())
    }
}

/// 공백만 있는 값은 거부하되, 저장은 입력값 그대로 한다.
fn require(label: &str, value: &str) -> Result<String> {
    if value.trim().is_empty() {
        bail!("{label} must not be empty");
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_reject_blank_values() {
        assert!(Credentials::basic("", "pw").is_err());
        assert!(Credentials::basic("user", "  ").is_err());
        assert!(Credentials::personal_access_token("").is_err());
        assert!(Credentials::oauth(" ").is_err());
        assert!(Credentials::azure_active_directory("user", "").is_err());
    }

    #[test]
    fn secrets_are_stored_verbatim() {
        let creds = Credentials::basic("user", " pass word ").unwrap();
        assert_eq!(
            creds,
            Credentials::Basic {
                user_name: "user".to_string(),
                password: " pass word ".to_string(),
            }
        );
        assert_eq!(
            Credentials::personal_access_token("tok ").unwrap(),
            Credentials::PersonalAccessToken("tok ".to_string())
        );
    }

    #[test]
    fn debug_output_hides_secrets() {
        let creds = Credentials::personal_access_token("secret-token").unwrap();
        let rendered = format!("{creds:?}");
        assert_eq!(rendered, "Credentials(pat)");
        assert!(!rendered.contains("secret"));
    }
}
