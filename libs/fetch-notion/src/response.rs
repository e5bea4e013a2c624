use notion_client::NotionClientError;

use crate::FetchNotionError;

type Response<T> = Result<T, FetchNotionError>;

pub trait IntoResponse<T> {
    fn into_response(self, message: &str) -> Response<T>;
}

impl<T> IntoResponse<T> for Result<T, std::io::Error> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| FetchNotionError::StdIoError {
            source: e,
            message: message.to_string(),
        })
    }
}

impl<T> IntoResponse<T> for Result<T, serde_json::Error> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| FetchNotionError::SerdeJsonError {
            source: e,
            message: message.to_string(),
        })
    }
}

impl<T> IntoResponse<T> for Result<T, NotionClientError> {
    fn into_response(self, message: &str) -> Response<T> {
        self.map_err(|e| FetchNotionError::NotionClientError {
            source: Box::new(e),
            message: message.to_string(),
        })
    }
}

impl<T> IntoResponse<T> for Option<T> {
    fn into_response(self, message: &str) -> Response<T> {
        self.ok_or_else(|| FetchNotionError::Option {
            message: message.to_string(),
        })
    }
}
