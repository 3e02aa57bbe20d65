use crate::error::*;
use tracing::{error, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::SearchApi(e) => {
                error!("Search API error details: {:?}", e);
            }
            CoreError::VolumeApi(e) => {
                error!("Volume API error details: {:?}", e);
            }
            CoreError::Fetch(e) => {
                error!("Content fetch error details: {:?}", e);
            }
            CoreError::Database(e) => {
                error!("Database error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::SearchApi(e) => e.user_friendly_message(),
            CoreError::VolumeApi(_) => {
                "검색량 조회에 실패했습니다. 검색광고 API 설정을 확인하세요.".to_string()
            }
            CoreError::Fetch(e) => e.user_friendly_message(),
            CoreError::Database(_) => {
                "분석 기록 저장소에 접근할 수 없습니다.".to_string()
            }
            CoreError::Config(_) => {
                "설정 파일이 올바르지 않습니다. 설정을 확인하세요.".to_string()
            }
            CoreError::Network(_) => {
                "네트워크 연결에 실패했습니다. 인터넷 연결을 확인하세요.".to_string()
            }
            CoreError::Timeout { .. } => {
                "요청이 너무 오래 걸려 중단되었습니다. 다시 시도하세요.".to_string()
            }
            CoreError::Invalid { message } => format!("잘못된 입력: {}", message),
            _ => "예상하지 못한 오류가 발생했습니다.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::SearchApi(_) => "SEARCH_API".to_string(),
            CoreError::VolumeApi(_) => "VOLUME_API".to_string(),
            CoreError::Fetch(_) => "FETCH".to_string(),
            CoreError::Database(_) => "DATABASE".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Serialization(_) => "SERIALIZATION".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::Invalid { .. } => "INVALID_INPUT".to_string(),
            CoreError::Timeout { .. } => "TIMEOUT".to_string(),
            CoreError::Internal { .. } => "INTERNAL".to_string(),
        }
    }
}

impl ErrorExt for SearchApiError {
    fn log_error(&self) -> &Self {
        error!("SearchApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("SearchApiError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            SearchApiError::AuthenticationFailed { .. } => {
                "검색 API 인증에 실패했습니다. Client ID/Secret을 확인하세요.".to_string()
            }
            SearchApiError::RateLimited => {
                "검색 API 호출 한도를 초과했습니다. 잠시 후 다시 시도하세요.".to_string()
            }
            SearchApiError::RequestTimeout => {
                "검색 API 응답이 지연되어 중단되었습니다.".to_string()
            }
            SearchApiError::InvalidResponse { .. } => {
                "검색 API 응답을 해석할 수 없습니다.".to_string()
            }
            SearchApiError::ServerError { status_code } => {
                format!("검색 API 서버 오류 (HTTP {}).", status_code)
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            SearchApiError::AuthenticationFailed { .. } => "SEARCH_AUTH".to_string(),
            SearchApiError::RateLimited => "SEARCH_RATE_LIMITED".to_string(),
            SearchApiError::RequestTimeout => "SEARCH_TIMEOUT".to_string(),
            SearchApiError::InvalidResponse { .. } => "SEARCH_BAD_RESPONSE".to_string(),
            SearchApiError::ServerError { .. } => "SEARCH_SERVER".to_string(),
        }
    }
}

impl ErrorExt for FetchError {
    fn log_error(&self) -> &Self {
        error!("FetchError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("FetchError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            FetchError::UnrecognizedUrl { url } => {
                format!("블로그 글 주소를 인식할 수 없습니다: {}", url)
            }
            FetchError::DocumentUnavailable { .. } => {
                "블로그 글을 불러오지 못했습니다.".to_string()
            }
            FetchError::ParseFailed { .. } => {
                "블로그 글 내용을 해석하지 못했습니다.".to_string()
            }
            FetchError::RequestTimeout => {
                "블로그 글 요청이 지연되어 중단되었습니다.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            FetchError::UnrecognizedUrl { .. } => "FETCH_BAD_URL".to_string(),
            FetchError::DocumentUnavailable { .. } => "FETCH_UNAVAILABLE".to_string(),
            FetchError::ParseFailed { .. } => "FETCH_PARSE".to_string(),
            FetchError::RequestTimeout => "FETCH_TIMEOUT".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        let err = CoreError::SearchApi(SearchApiError::RateLimited);
        assert_eq!(err.error_code(), "SEARCH_API");
        assert_eq!(
            SearchApiError::RateLimited.error_code(),
            "SEARCH_RATE_LIMITED"
        );
    }

    #[test]
    fn test_fetch_error_messages_name_the_url() {
        let err = FetchError::UnrecognizedUrl {
            url: "https://example.com/x".to_string(),
        };
        assert!(err.user_friendly_message().contains("https://example.com/x"));
    }
}
