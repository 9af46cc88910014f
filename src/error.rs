//! Defines the app level error type and conversions to rendered HTML pages, alerts and JSON.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, database_id::AccountId, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database or workspace lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A controller was constructed without the element it renders into.
    #[error("{0}: the element to render into was not provided")]
    MissingElement(&'static str),

    /// An empty string was used as a name for an account or transaction.
    #[error("the name cannot be empty")]
    EmptyName,

    /// The specified account name already exists in the database.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccountName(String),

    /// A transaction sum was negative or not a number.
    #[error("{0} is not a valid sum, it must be zero or greater")]
    InvalidSum(f64),

    /// The account ID used to create a transaction did not match an account.
    #[error("the account ID {0} does not refer to a valid account")]
    InvalidAccount(AccountId),

    /// A timestamp could not be formatted for storage.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A blocking task that fetches data panicked or was cancelled.
    #[error("background task failed: {0}")]
    TaskJoinError(String),

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// A click asked to remove an account that the page no longer shows.
    #[error("account {0} is no longer shown on the page")]
    AccountNotShown(AccountId),

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Неверный часовой пояс",
                fix: &format!(
                    "Не удалось определить часовой пояс \"{timezone}\". Проверьте настройки \
                    сервера: часовой пояс должен быть каноническим именем, например Europe/Moscow."
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Не найдено".to_owned(),
                    details: "Запрошенные данные не найдены. Попробуйте обновить страницу."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingAccount => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Не удалось удалить счёт".to_owned(),
                    details: "Счёт не найден. Обновите страницу: возможно, он уже удалён."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Не удалось удалить транзакцию".to_owned(),
                    details: "Транзакция не найдена. Обновите страницу: возможно, она уже удалена."
                        .to_owned(),
                },
            ),
            Error::AccountNotShown(_) => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Страница устарела".to_owned(),
                    details: "Счёт на странице сменился в другой вкладке. Обновите страницу и \
                        попробуйте ещё раз."
                        .to_owned(),
                },
            ),
            Error::EmptyName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Не указано название".to_owned(),
                    details: "Введите название и попробуйте ещё раз.".to_owned(),
                },
            ),
            Error::InvalidSum(sum) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Неверная сумма".to_owned(),
                    details: format!("{sum} не может быть суммой транзакции."),
                },
            ),
            Error::InvalidAccount(account_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Неверный счёт".to_owned(),
                    details: format!("Счёт с ID {account_id} не найден. Выберите другой счёт."),
                },
            ),
            Error::DuplicateAccountName(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Такой счёт уже есть".to_owned(),
                    details: format!("Счёт «{name}» уже существует, выберите другое название."),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Неверный часовой пояс".to_owned(),
                    details: format!(
                        "Не удалось определить часовой пояс \"{timezone}\". \
                        Проверьте настройки сервера."
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Что-то пошло не так".to_owned(),
                        details: "Произошла непредвиденная ошибка, подробности в журнале сервера."
                            .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn no_rows_is_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn not_found_page_has_404_status() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn alert_status_codes() {
        let cases = [
            (Error::DeleteMissingAccount, StatusCode::NOT_FOUND),
            (Error::DeleteMissingTransaction, StatusCode::NOT_FOUND),
            (Error::EmptyName, StatusCode::BAD_REQUEST),
            (Error::InvalidSum(-1.0), StatusCode::BAD_REQUEST),
            (Error::InvalidAccount(3), StatusCode::BAD_REQUEST),
            (Error::AccountNotShown(2), StatusCode::CONFLICT),
            (Error::DatabaseLockError, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, want_status) in cases {
            let description = error.to_string();
            let response = error.into_alert_response();

            assert_eq!(response.status(), want_status, "for error \"{description}\"");
        }
    }
}
