use crate::error::AttendanceError;
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use futures::future::{Ready, ready};

/// Credentials presented by the caller, forwarded verbatim to the identity
/// service. This service never inspects them.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    authorization: Option<String>,
    cookie: Option<String>,
}

impl Caller {
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    #[cfg(test)]
    pub fn bearer(token: &str) -> Self {
        Self {
            authorization: Some(format!("Bearer {token}")),
            cookie: None,
        }
    }
}

impl FromRequest for Caller {
    type Error = AttendanceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let read = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned)
        };

        let caller = Caller {
            authorization: read(header::AUTHORIZATION),
            cookie: read(header::COOKIE),
        };

        if caller.authorization.is_none() && caller.cookie.is_none() {
            return ready(Err(AttendanceError::unauthorized("missing credentials")));
        }

        ready(Ok(caller))
    }
}
