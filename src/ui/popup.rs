/// Popup UI: quick links for the current or last visited company

use crate::browser::{active_tab_url, load_state, open_tab, save_state};
use crate::storage::{PopupResolution, StoredState, resolve_company, tab_company};
use crate::subdomain::CompanySite;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum PopupState {
    Loading,
    Ready(PopupResolution),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| PopupState::Loading);
    let storage_warning = use_state(|| None::<String>);

    // Resolve the company on open
    {
        let state = state.clone();
        let storage_warning = storage_warning.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match resolve_on_open().await {
                    Ok((resolution, warning)) => {
                        storage_warning.set(warning);
                        state.set(PopupState::Ready(resolution));
                    }
                    Err(e) => {
                        state.set(PopupState::Error(e));
                    }
                }
            });
            || ()
        });
    }

    let open_url = {
        let state = state.clone();
        move |url: String| {
            let state = state.clone();
            Callback::from(move |_: MouseEvent| {
                let url = url.clone();
                let state = state.clone();
                spawn_local(async move {
                    if let Err(e) = open_tab(&url).await {
                        state.set(PopupState::Error(e));
                    }
                });
            })
        }
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Bamboo Helper"}</h1>

            if let Some(warning) = (*storage_warning).clone() {
                <Alert r#type={AlertType::Warning} title={warning} inline={true}>
                </Alert>
            }

            {match &*state {
                PopupState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                PopupState::Ready(resolution) => {
                    let site = resolution.subdomain().map(CompanySite::new);
                    html! {
                        <div class="flex-column-gap">
                            <p class="message-text">{resolution.status_text()}</p>
                            if let Some(site) = site {
                                <>
                                    <Button onclick={open_url(site.request_url())}>
                                        {"Request Time Off"}
                                    </Button>
                                    <Button
                                        onclick={open_url(site.calendar_url())}
                                        variant={ButtonVariant::Secondary}
                                    >
                                        {"Open Calendar"}
                                    </Button>
                                </>
                            }
                        </div>
                    }
                }
            }}

            <p class="footer-popup">
                {concat!("Bamboo Helper v", env!("CARGO_PKG_VERSION"))}
            </p>
        </div>
    }
}

// Helper functions

/// Resolve the popup's company, persisting it when the tab is a BambooHR page
///
/// Storage is read only when the tab names no company. Storage failures
/// degrade to "nothing stored" and are reported as a warning.
async fn resolve_on_open() -> Result<(PopupResolution, Option<String>), String> {
    let tab_url = active_tab_url().await?;
    let mut warning = None;

    let stored = if tab_company(tab_url.as_deref()).is_some() {
        StoredState::default()
    } else {
        match load_state().await {
            Ok(stored) => stored,
            Err(e) => {
                log::error!("{}", e);
                warning = Some("Could not read the last visited company".to_string());
                StoredState::default()
            }
        }
    };

    let resolution = resolve_company(tab_url.as_deref(), &stored);

    if let Some(to_save) = resolution.to_persist() {
        if let Err(e) = save_state(&to_save).await {
            log::error!("{}", e);
            warning = Some("Could not remember this company".to_string());
        }
    }

    Ok((resolution, warning))
}
