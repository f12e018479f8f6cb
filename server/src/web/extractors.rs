// server/src/web/extractors.rs

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use harvest::{Identity, Role};
use tracing::warn;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// The caller as identified by the `X-User-ID` and `X-User-Role` headers.
///
/// Stand-in for real authentication: the id is trusted as sent. A missing
/// role header means a customer.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
  pub fn identity(&self) -> &Identity {
    &self.0
  }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
  req.headers().get(name).and_then(|value| value.to_str().ok())
}

fn identify(req: &HttpRequest) -> Result<Identity, AppError> {
  let user_id = header(req, USER_ID_HEADER)
    .and_then(|raw| raw.trim().parse::<u64>().ok())
    .ok_or_else(|| AppError::Auth(format!("Missing or invalid {} header.", USER_ID_HEADER)))?;
  let role = match header(req, USER_ROLE_HEADER) {
    Some(raw) => raw
      .parse::<Role>()
      .map_err(|_| AppError::Auth(format!("Unknown role '{}' in {} header.", raw, USER_ROLE_HEADER)))?,
    None => Role::Customer,
  };
  Ok(Identity { user_id, role })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let result = identify(req).map(AuthenticatedUser);
    if let Err(e) = &result {
      warn!(error = %e, path = %req.path(), "AuthenticatedUser extractor rejected request.");
    }
    ready(result)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[test]
  fn reads_id_and_role_headers() {
    let req = TestRequest::default()
      .insert_header((USER_ID_HEADER, "42"))
      .insert_header((USER_ROLE_HEADER, "seller"))
      .to_http_request();
    let identity = identify(&req).unwrap();
    assert_eq!(identity.user_id, 42);
    assert_eq!(identity.role, Role::Farmer);
  }

  #[test]
  fn role_defaults_to_customer() {
    let req = TestRequest::default().insert_header((USER_ID_HEADER, "7")).to_http_request();
    assert_eq!(identify(&req).unwrap().role, Role::Customer);
  }

  #[test]
  fn missing_or_bad_id_is_unauthorized() {
    let req = TestRequest::default().to_http_request();
    assert!(matches!(identify(&req), Err(AppError::Auth(_))));
    let req = TestRequest::default().insert_header((USER_ID_HEADER, "abc")).to_http_request();
    assert!(matches!(identify(&req), Err(AppError::Auth(_))));
    let req = TestRequest::default()
      .insert_header((USER_ID_HEADER, "1"))
      .insert_header((USER_ROLE_HEADER, "admin"))
      .to_http_request();
    assert!(matches!(identify(&req), Err(AppError::Auth(_))));
  }
}
