use axum::{Form, extract::State, http::StatusCode, response::Response};
use serde::Deserialize;

use super::PageContext;
use crate::{
    AppState,
    contact::{Action, ContactWizard, Step},
    views::{layout::Nav, site},
};

/// ContactPost
///
/// One wizard step as posted: the visible field, the hidden carried values
/// and the button that was pressed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactPost {
    pub step: Step,
    pub name: String,
    pub email: String,
    pub message: String,
    pub action: Action,
}

impl ContactPost {
    fn into_parts(self) -> (ContactWizard, Action) {
        (
            ContactWizard {
                step: self.step,
                name: self.name,
                email: self.email,
                message: self.message,
            },
            self.action,
        )
    }
}

pub async fn show(ctx: PageContext) -> Response {
    ctx.site("Contact", site::contact(&ContactWizard::default(), None))
}

/// submit
///
/// [Public Route] Advances or rewinds the wizard. Completing the last step
/// forwards the message to the backend; if that fails the visitor stays on
/// the message step with their text intact.
pub async fn submit(
    ctx: PageContext,
    State(state): State<AppState>,
    Form(post): Form<ContactPost>,
) -> Response {
    let (mut wizard, action) = post.into_parts();

    match wizard.apply(action) {
        Ok(None) => ctx.site("Contact", site::contact(&wizard, None)),
        Ok(Some(submission)) => match state.api.submit_contact(&submission).await {
            Ok(()) => {
                tracing::info!("Contact message forwarded");
                ctx.site("Contact", site::contact(&wizard, None))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Contact submission failed");
                wizard.reopen();
                let body = site::contact(&wizard, Some(&err.user_message()));
                ctx.render(StatusCode::BAD_GATEWAY, "Contact", Nav::Site, body)
            }
        },
        Err(err) => {
            let body = site::contact(&wizard, Some(&err.to_string()));
            ctx.render(StatusCode::UNPROCESSABLE_ENTITY, "Contact", Nav::Site, body)
        }
    }
}
