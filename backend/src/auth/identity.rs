//! Resolves the calling teacher once per request.
//!
//! Login and session handling live upstream of this service. What reaches us is
//! whatever the `AuthIdentityProvider` registered as app data can read from the
//! request; the default reads a trusted header carrying the teacher id. The
//! `resolve_identity` middleware stores the result in the request extensions and
//! handlers take it as an explicit `CurrentTeacher` argument.

use actix_web::body::MessageBody;
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use log::debug;

pub type TeacherId = i64;

/// Source of the authenticated teacher id for a request.
pub trait AuthIdentityProvider: Send + Sync {
    /// `None` means the caller is anonymous.
    fn resolve(&self, req: &HttpRequest) -> Option<TeacherId>;
}

/// Reads the teacher id from a header set by the upstream login layer.
#[derive(Debug, Clone)]
pub struct HeaderIdentityProvider {
    header: String,
}

impl HeaderIdentityProvider {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl AuthIdentityProvider for HeaderIdentityProvider {
    fn resolve(&self, req: &HttpRequest) -> Option<TeacherId> {
        req.headers()
            .get(self.header.as_str())
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<TeacherId>().ok())
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedIdentity(Option<TeacherId>);

/// Middleware: asks the registered provider who is calling and records the answer.
pub async fn resolve_identity(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let teacher = req
        .app_data::<web::Data<dyn AuthIdentityProvider>>()
        .and_then(|provider| provider.resolve(req.request()));
    debug!("{} {} as {:?}", req.method(), req.path(), teacher);
    req.extensions_mut().insert(ResolvedIdentity(teacher));
    next.call(req).await
}

/// The teacher behind the current request, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentTeacher(pub Option<TeacherId>);

impl CurrentTeacher {
    pub fn id(self) -> Option<TeacherId> {
        self.0
    }
}

impl FromRequest for CurrentTeacher {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let teacher = req
            .extensions()
            .get::<ResolvedIdentity>()
            .and_then(|resolved| resolved.0);
        ready(Ok(CurrentTeacher(teacher)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn header_provider_reads_integer_ids() {
        let provider = HeaderIdentityProvider::new("x-teacher-id");
        let req = TestRequest::default()
            .insert_header(("X-Teacher-Id", " 42 "))
            .to_http_request();
        assert_eq!(provider.resolve(&req), Some(42));
    }

    #[test]
    fn header_provider_treats_garbage_as_anonymous() {
        let provider = HeaderIdentityProvider::new("x-teacher-id");
        let req = TestRequest::default()
            .insert_header(("x-teacher-id", "admin"))
            .to_http_request();
        assert_eq!(provider.resolve(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(provider.resolve(&req), None);
    }
}
