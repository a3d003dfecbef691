//! HTTP surface: `GET /` shows the form, `POST /` runs the advisor

mod page;

use axum::{
    Form, Router,
    extract::State,
    response::Html,
    routing::get,
};
use tracing::info;

use crate::advisor::{PhoneAdvisor, Verdict};
use crate::models::{PreferenceForm, UserPreference};
use page::Notice;

const INVALID_BUDGET: &str = "Budget must be a whole number.";

#[derive(Clone)]
pub struct AppState {
    pub advisor: PhoneAdvisor,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .with_state(state)
}

async fn index_handler() -> Html<String> {
    Html(page::render(&PreferenceForm::default(), &[], Notice::Nothing))
}

async fn submit_handler(
    State(state): State<AppState>,
    Form(form): Form<PreferenceForm>,
) -> Html<String> {
    let pref = match UserPreference::try_from(form.clone()) {
        Ok(pref) => pref,
        Err(e) => {
            info!("Rejected budget {:?}: {}", form.budget, e);
            return Html(page::render(&form, &[], Notice::Message(INVALID_BUDGET)));
        }
    };

    let rec = state.advisor.recommend(&pref).await;
    let notice = match &rec.verdict {
        Verdict::Recommendation(html) => Notice::Markup(html),
        Verdict::Failure(message) => Notice::Message(*message),
    };

    Html(page::render(&form, &rec.ranked, notice))
}
