//! HTTP Basic authentication
//!
//! Protected handlers take an [`AuthenticatedClient`] argument. Since it is an
//! extractor, it only runs once a route has matched: unknown paths still answer
//! 404 whatever credentials come with them.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::Header;
use actix_web::{FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Basic};

use libvantage::error::VantageError;
use libvantage::model::Account;
use libvantage::storage::ClientSpace;

use crate::app_data::app_data;

#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    account: Account,
    space: ClientSpace,
}

impl AuthenticatedClient {
    pub fn username(&self) -> &str {
        &self.account.username
    }

    /// Storage scoped to this client
    pub fn space(&self) -> &ClientSpace {
        &self.space
    }
}

impl FromRequest for AuthenticatedClient {
    type Error = VantageError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedClient, VantageError> {
    let app_data = app_data(req)?;

    let header = Authorization::<Basic>::parse(req).map_err(|_| {
        log::debug!("missing or malformed basic auth on {}", req.path());
        VantageError::Unauthorized
    })?;
    let credentials = header.into_scheme();
    let password = credentials
        .password()
        .map(|p| p.to_string())
        .unwrap_or_default();

    let account = app_data
        .accounts
        .authenticate(credentials.user_id(), &password)?;
    let space = app_data.layout.client_space(&account);
    Ok(AuthenticatedClient { account, space })
}
