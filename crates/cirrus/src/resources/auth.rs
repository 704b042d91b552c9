//! Authentication service

use http::Method;

use super::Resource;
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::Result;
use crate::types::auth::{
    ClientCredentialsRequest, ConfirmSignUpRequest, EmailRequest, LoginRequest, RefreshRequest,
    ResetPasswordRequest, SignUpRequest, SignUpResponse, TokenSet, User,
};

/// Authentication API resource.
///
/// Sign-up, login, token refresh, and password flows. Failures carry the
/// server's own codes where it sends them (`not_confirmed`, `expired_code`,
/// `invalid_client`, ...).
#[derive(Debug, Clone)]
pub struct Auth {
    config: ClientConfig,
}

impl Auth {
    pub(crate) fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Register a new user.
    #[tracing::instrument(skip_all, fields(email = %request.email))]
    pub async fn sign_up(&self, ctx: &Context, request: &SignUpRequest) -> Result<SignUpResponse> {
        Ok(self
            .config
            .request(Method::POST, "/auth/signup")?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Confirm a sign-up with the emailed code.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn confirm_sign_up(&self, ctx: &Context, email: &str, code: &str) -> Result<()> {
        self.config
            .request(Method::POST, "/auth/confirm")?
            .json(&ConfirmSignUpRequest { email, code })?
            .send_empty(ctx)
            .await?;
        Ok(())
    }

    /// Send a new confirmation code.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn resend_confirmation_code(&self, ctx: &Context, email: &str) -> Result<()> {
        self.config
            .request(Method::POST, "/auth/resend-code")?
            .json(&EmailRequest { email })?
            .send_empty(ctx)
            .await?;
        Ok(())
    }

    /// Log in with email and password.
    #[tracing::instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, ctx: &Context, request: &LoginRequest) -> Result<TokenSet> {
        Ok(self
            .config
            .request(Method::POST, "/auth/login")?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Exchange a refresh token for a new token set.
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self, ctx: &Context, refresh_token: &str) -> Result<TokenSet> {
        Ok(self
            .config
            .request(Method::POST, "/auth/refresh")?
            .json(&RefreshRequest { refresh_token })?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// OAuth2 client-credentials grant for service accounts.
    #[tracing::instrument(skip_all, fields(client_id = %request.client_id))]
    pub async fn client_credentials(
        &self,
        ctx: &Context,
        request: &ClientCredentialsRequest,
    ) -> Result<TokenSet> {
        Ok(self
            .config
            .request(Method::POST, "/auth/token")?
            .json(request)?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Start a password reset.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn forgot_password(&self, ctx: &Context, email: &str) -> Result<()> {
        self.config
            .request(Method::POST, "/auth/forgot-password")?
            .json(&EmailRequest { email })?
            .send_empty(ctx)
            .await?;
        Ok(())
    }

    /// Finish a password reset with the emailed code.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn reset_password(
        &self,
        ctx: &Context,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<()> {
        self.config
            .request(Method::POST, "/auth/reset-password")?
            .json(&ResetPasswordRequest {
                email,
                code,
                new_password,
            })?
            .send_empty(ctx)
            .await?;
        Ok(())
    }

    /// The user the current token belongs to.
    #[tracing::instrument(skip_all)]
    pub async fn me(&self, ctx: &Context) -> Result<User> {
        Ok(self
            .config
            .request(Method::GET, "/auth/me")?
            .send(ctx)
            .await?
            .into_parsed_or_default())
    }

    /// Revoke the current token.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, ctx: &Context) -> Result<()> {
        self.config
            .request(Method::POST, "/auth/logout")?
            .send_empty(ctx)
            .await?;
        Ok(())
    }
}

impl Resource for Auth {
    fn config(&self) -> &ClientConfig {
        &self.config
    }
}
