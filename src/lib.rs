pub mod data;
pub mod export;
pub mod model;
pub mod reorder;
pub mod storage;
pub mod tracker;

use data::{fetch_available_guides, load_guide, GuideInfo};
use export::ExportFormat;
use log::warn;
use model::{Entry, Tier};
use reorder::{is_valid_target, move_entry, DragSession};
use std::collections::HashMap;
use std::rc::Rc;
use storage::{load_state as load_storage_state, save_state as persist_state};
use tracker::ModificationTracker;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(PartialEq, Clone)]
enum FetchStatus {
    Idle,
    Loading,
    Error(String),
}

#[function_component(App)]
fn app() -> Html {
    let guides_status = use_state(|| FetchStatus::Loading);
    let guides = use_state(|| None::<Vec<GuideInfo>>);
    let persisted_state = use_state(load_storage_state);

    let initial_selection = (*persisted_state).selected_guide.clone();
    let selected_guide = use_state(move || initial_selection);

    let board_status = use_state(|| FetchStatus::Idle);
    let tracker = use_state(|| None::<ModificationTracker>);
    let drag_session = use_state(|| None::<DragSession>);
    // Per-tier dragenter/dragleave counters. Nested DOM nodes fire paired
    // enter/leave events, so a plain boolean would flicker; the tier is
    // highlighted while its counter stays positive.
    let hover_counts = use_state(HashMap::<String, i32>::new);
    let menu_open = use_state(|| false);
    let guides_expanded = use_state(|| false);
    let show_reset_confirm = use_state(|| false);

    {
        let guides_status = guides_status.clone();
        let guides = guides.clone();
        let selected_guide = selected_guide.clone();
        let persisted_state = persisted_state.clone();

        use_effect_with_deps(
            move |_| {
                guides_status.set(FetchStatus::Loading);

                let guides_status = guides_status.clone();
                let guides = guides.clone();
                let selected_guide = selected_guide.clone();
                let previously_selected = (*selected_guide).clone();
                let persisted_state = persisted_state.clone();

                spawn_local(async move {
                    match fetch_available_guides().await {
                        Ok(fetched) => {
                            let previous = previously_selected
                                .or_else(|| persisted_state.selected_guide.clone());
                            let default_selection = resolve_selection(&fetched, previous);
                            guides.set(Some(fetched));
                            if let Some(selection) = default_selection {
                                selected_guide.set(Some(selection));
                            }
                            guides_status.set(FetchStatus::Idle);
                        }
                        Err(err) => {
                            guides_status.set(FetchStatus::Error(err.to_string()));
                            guides.set(None);
                            selected_guide.set(None);
                        }
                    }
                });

                || ()
            },
            (),
        );
    }

    {
        let board_status = board_status.clone();
        let tracker_handle = tracker.clone();
        let drag_session_handle = drag_session.clone();
        let hover_counts_handle = hover_counts.clone();

        use_effect_with_deps(
            move |selected: &Option<String>| {
                match selected {
                    Some(id) => {
                        board_status.set(FetchStatus::Loading);
                        // A fresh tracker per guide: modifications never
                        // bleed across datasets.
                        tracker_handle.set(None);
                        drag_session_handle.set(None);
                        hover_counts_handle.set(HashMap::new());

                        let id = id.clone();
                        let board_status = board_status.clone();
                        let tracker_handle = tracker_handle.clone();

                        spawn_local(async move {
                            match load_guide(&id).await {
                                Ok(collection) => {
                                    tracker_handle.set(Some(ModificationTracker::new(
                                        Rc::new(collection),
                                    )));
                                    board_status.set(FetchStatus::Idle);
                                }
                                Err(err) => {
                                    board_status.set(FetchStatus::Error(err.to_string()));
                                    tracker_handle.set(None);
                                }
                            }
                        });
                    }
                    None => {
                        tracker_handle.set(None);
                        drag_session_handle.set(None);
                        hover_counts_handle.set(HashMap::new());
                        board_status.set(FetchStatus::Idle);
                    }
                };

                || ()
            },
            (*selected_guide).clone(),
        );
    }

    {
        let selected_guide = selected_guide.clone();
        let persisted_state = persisted_state.clone();

        use_effect_with_deps(
            move |current: &Option<String>| {
                let mut next_state = (*persisted_state).clone();
                if next_state.selected_guide != *current {
                    next_state.selected_guide = current.clone();
                    persist_state(&next_state);
                    persisted_state.set(next_state);
                }
                || ()
            },
            (*selected_guide).clone(),
        );
    }

    let on_reset = {
        let tracker = tracker.clone();
        let drag_session = drag_session.clone();
        let hover_counts = hover_counts.clone();
        let show_reset_confirm = show_reset_confirm.clone();

        Callback::from(move |_| {
            if let Some(mut current) = (*tracker).clone() {
                current.reset();
                tracker.set(Some(current));
            }
            drag_session.set(None);
            hover_counts.set(HashMap::new());
            show_reset_confirm.set(false);
        })
    };

    let toggle_menu_button = {
        let menu_open = menu_open.clone();
        let show_reset_confirm = show_reset_confirm.clone();
        Callback::from(move |_: yew::MouseEvent| {
            let next = !*menu_open;
            menu_open.set(next);
            if !next {
                show_reset_confirm.set(false);
            }
        })
    };

    let menu_close_callback = {
        let menu_open = menu_open.clone();
        let show_reset_confirm = show_reset_confirm.clone();
        Callback::from(move |_| {
            if *menu_open {
                menu_open.set(false);
                show_reset_confirm.set(false);
            }
        })
    };

    let toggle_guides = {
        let guides_expanded = guides_expanded.clone();
        Callback::from(move |_| {
            let next = !*guides_expanded;
            guides_expanded.set(next);
        })
    };

    let request_reset = {
        let show_reset_confirm = show_reset_confirm.clone();
        Callback::from(move |_| {
            show_reset_confirm.set(true);
        })
    };

    let cancel_reset = {
        let show_reset_confirm = show_reset_confirm.clone();
        Callback::from(move |_| {
            show_reset_confirm.set(false);
        })
    };

    let confirm_reset = {
        let on_reset = on_reset.clone();
        Callback::from(move |_| {
            on_reset.emit(());
        })
    };

    let on_select_guide = {
        let selected_guide = selected_guide.clone();
        let menu_open = menu_open.clone();
        let show_reset_confirm = show_reset_confirm.clone();
        Callback::from(move |guide_id: String| {
            selected_guide.set(Some(guide_id.clone()));
            show_reset_confirm.set(false);
            menu_open.set(false);
        })
    };

    let menu_markup = render_menu(
        *menu_open,
        *guides_expanded,
        *show_reset_confirm,
        &guides_status,
        &guides,
        &selected_guide,
        &tracker,
        menu_close_callback.clone(),
        on_select_guide,
        toggle_guides.clone(),
        request_reset.clone(),
        cancel_reset.clone(),
        confirm_reset.clone(),
    );

    html! {
        <div class="app-container">
            <button class={classes!("hamburger-button", if *menu_open { "open" } else { "" })}
                onclick={toggle_menu_button.clone()}>
                <span></span>
                <span></span>
                <span></span>
            </button>
            { menu_markup }
            <main class="content">
                { render_board(&board_status, &tracker, &drag_session, &hover_counts) }
            </main>
        </div>
    }
}

fn render_menu(
    menu_open: bool,
    guides_expanded: bool,
    show_reset_confirm: bool,
    status: &UseStateHandle<FetchStatus>,
    guides: &UseStateHandle<Option<Vec<GuideInfo>>>,
    selected_guide: &UseStateHandle<Option<String>>,
    tracker: &UseStateHandle<Option<ModificationTracker>>,
    on_close: Callback<()>,
    on_select_guide: Callback<String>,
    on_toggle_guides: Callback<()>,
    on_request_reset: Callback<()>,
    on_cancel_reset: Callback<()>,
    on_confirm_reset: Callback<()>,
) -> Html {
    let overlay_classes = classes!("menu-overlay", if menu_open { Some("open") } else { None });
    let panel_classes = classes!("menu-panel", if menu_open { Some("open") } else { None });
    let stop_click = Callback::from(|event: web_sys::MouseEvent| event.stop_propagation());
    let close_click = {
        let on_close = on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    let toggle_guides_click = {
        let on_toggle_guides = on_toggle_guides.clone();
        Callback::from(move |_| on_toggle_guides.emit(()))
    };
    let request_reset_click = {
        let on_request_reset = on_request_reset.clone();
        Callback::from(move |_| on_request_reset.emit(()))
    };
    let cancel_reset_click = {
        let on_cancel_reset = on_cancel_reset.clone();
        Callback::from(move |_| on_cancel_reset.emit(()))
    };
    let confirm_reset_click = {
        let on_confirm_reset = on_confirm_reset.clone();
        Callback::from(move |_| on_confirm_reset.emit(()))
    };

    let current_selection = (*selected_guide).clone();

    let guides_section = match &**status {
        FetchStatus::Loading => html! { <p class="menu-placeholder">{ "Loading guides…" }</p> },
        FetchStatus::Error(message) => html! { <p class="menu-error">{ message }</p> },
        FetchStatus::Idle => match &**guides {
            Some(guide_vec) if !guide_vec.is_empty() => html! {
                <div class="menu-list-buttons">
                    { for guide_vec.iter().map(|info| render_guide_button(info, &current_selection, &on_select_guide)) }
                </div>
            },
            _ => html! { <p class="menu-placeholder">{ "No guides available." }</p> },
        },
    };

    let export_section = match (&**tracker).as_ref() {
        Some(current) => {
            let effective = current.effective().clone();
            let copy_source = effective.clone();
            let copy_click = Callback::from(move |_| {
                export::copy_to_clipboard(&copy_source, ExportFormat::PlainText);
            });

            html! {
                <div class="export-buttons">
                    { for ExportFormat::ALL.iter().map(|format| {
                        let format = *format;
                        let effective = effective.clone();
                        let onclick = Callback::from(move |_| {
                            export::download(&effective, format);
                        });
                        html! {
                            <button class="menu-action export" key={format.label()} onclick={onclick}>
                                { format!("Download {}", format.label()) }
                            </button>
                        }
                    }) }
                    <button class="menu-action export" onclick={copy_click}>{ "Copy to clipboard" }</button>
                </div>
            }
        }
        None => html! { <p class="menu-placeholder">{ "Load a guide to export it." }</p> },
    };

    let reset_section = if show_reset_confirm {
        html! {
            <div class="reset-confirm">
                <p>{ "Discard your changes and restore the published ranking?" }</p>
                <div class="confirm-actions">
                    <button class="confirm-yes" onclick={confirm_reset_click.clone()}>{ "Yes" }</button>
                    <button class="confirm-no" onclick={cancel_reset_click.clone()}>{ "No" }</button>
                </div>
            </div>
        }
    } else {
        let is_dirty = (&**tracker)
            .as_ref()
            .map(|current| current.is_dirty())
            .unwrap_or(false);
        html! {
            <button class="menu-action reset" disabled={!is_dirty} onclick={request_reset_click}>
                { "Reset ranking" }
            </button>
        }
    };

    html! {
        <div class={overlay_classes} onclick={close_click.clone()}>
            <aside class={panel_classes} onclick={stop_click}>
                <div class="menu-header">
                    <h2>{ "Menu" }</h2>
                    <button class="menu-close" onclick={close_click}>{ "×" }</button>
                </div>

                <div class="menu-section">
                    <button class={classes!("menu-toggle", if guides_expanded { "expanded" } else { "" })}
                        onclick={toggle_guides_click}>
                        <span>{ "Guides" }</span>
                        <span class="chevron">{ if guides_expanded { "▾" } else { "▸" } }</span>
                    </button>
                    {
                        if guides_expanded {
                            guides_section
                        } else {
                            html! {}
                        }
                    }
                </div>

                <div class="menu-section">
                    { reset_section }
                </div>

                <div class="menu-section export">
                    <div class="menu-section-header">
                        <h3>{ "Export" }</h3>
                    </div>
                    { export_section }
                </div>
            </aside>
        </div>
    }
}

fn render_guide_button(
    info: &GuideInfo,
    current_selection: &Option<String>,
    on_select_guide: &Callback<String>,
) -> Html {
    let id = info.id.clone();
    let label = info.label.clone();
    let is_active = current_selection
        .as_ref()
        .map(|selected| selected == &info.id)
        .unwrap_or(false);

    let class = if is_active {
        "list-button active"
    } else {
        "list-button"
    };

    let on_click = {
        let on_select_guide = on_select_guide.clone();
        Callback::from(move |_| {
            on_select_guide.emit(id.clone());
        })
    };

    html! {
        <button class={class} onclick={on_click}>{ label }</button>
    }
}

fn render_board(
    status: &UseStateHandle<FetchStatus>,
    tracker: &UseStateHandle<Option<ModificationTracker>>,
    drag_session: &UseStateHandle<Option<DragSession>>,
    hover_counts: &UseStateHandle<HashMap<String, i32>>,
) -> Html {
    match &**status {
        FetchStatus::Loading => html! { <p>{ "Loading guide…" }</p> },
        FetchStatus::Error(message) => html! { <p class="error">{ message }</p> },
        FetchStatus::Idle => {
            let Some(current) = (&**tracker).as_ref() else {
                return html! { <p>{ "Select a guide to begin." }</p> };
            };
            let collection = current.effective().clone();
            let dirty = current.is_dirty();

            html! {
                <div class="tier-board">
                    <header class="board-header">
                        <h1>{ &collection.title }</h1>
                        {
                            match &collection.description {
                                Some(description) => html! { <p class="board-description">{ description }</p> },
                                None => html! {},
                            }
                        }
                        {
                            if dirty {
                                html! { <span class="modified-badge">{ "Modified" }</span> }
                            } else {
                                html! {}
                            }
                        }
                    </header>
                    { for collection.tiers.iter().map(|tier| {
                        render_tier(tier, tracker, drag_session, hover_counts)
                    }) }
                </div>
            }
        }
    }
}

fn render_tier(
    tier: &Tier,
    tracker: &UseStateHandle<Option<ModificationTracker>>,
    drag_session: &UseStateHandle<Option<DragSession>>,
    hover_counts: &UseStateHandle<HashMap<String, i32>>,
) -> Html {
    let label = tier.label.clone();
    let session = (&**drag_session).clone();
    let is_target = session
        .as_ref()
        .map(|active| is_valid_target(active, &label))
        .unwrap_or(false);
    let hovered = hover_counts.get(&label).copied().unwrap_or(0) > 0;
    let highlighted = is_target && hovered;

    let ondragenter = {
        let drag_session = drag_session.clone();
        let hover_counts = hover_counts.clone();
        let label = label.clone();
        Callback::from(move |event: DragEvent| {
            if (*drag_session).is_none() {
                return;
            }
            event.prevent_default();
            let mut counts = (*hover_counts).clone();
            *counts.entry(label.clone()).or_insert(0) += 1;
            hover_counts.set(counts);
        })
    };

    let ondragleave = {
        let hover_counts = hover_counts.clone();
        let label = label.clone();
        Callback::from(move |_: DragEvent| {
            let mut counts = (*hover_counts).clone();
            if let Some(count) = counts.get_mut(&label) {
                *count -= 1;
                if *count <= 0 {
                    counts.remove(&label);
                }
                hover_counts.set(counts);
            }
        })
    };

    // The drop event only fires where dragover was prevented, so invalid
    // tiers never receive a drop in the first place.
    let ondragover = {
        let drag_session = drag_session.clone();
        let label = label.clone();
        Callback::from(move |event: DragEvent| {
            let valid = (*drag_session)
                .as_ref()
                .map(|active| is_valid_target(active, &label))
                .unwrap_or(false);
            if valid {
                event.prevent_default();
                if let Some(transfer) = event.data_transfer() {
                    transfer.set_drop_effect("move");
                }
            }
        })
    };

    let ondrop = {
        let tracker = tracker.clone();
        let drag_session = drag_session.clone();
        let hover_counts = hover_counts.clone();
        let label = label.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();

            if let (Some(session), Some(mut current)) =
                ((*drag_session).clone(), (*tracker).clone())
            {
                if is_valid_target(&session, &label) {
                    let effective = current.effective().clone();
                    match move_entry(&effective, &session, &label) {
                        Some(updated) => {
                            current.apply(Rc::new(updated));
                            tracker.set(Some(current));
                        }
                        None => {
                            // Only reachable through a stale session; the
                            // engine already rejected the move safely.
                            warn!(
                                "Dropped '{}' on tier '{}' with a stale drag session",
                                session.entry.id, label
                            );
                        }
                    }
                }
            }

            drag_session.set(None);
            hover_counts.set(HashMap::new());
        })
    };

    let row_classes = classes!(
        "tier-row",
        if highlighted { Some("drop-target") } else { None }
    );

    html! {
        <section class={row_classes} key={tier.label.clone()}
            ondragenter={ondragenter} ondragleave={ondragleave}
            ondragover={ondragover} ondrop={ondrop}>
            <div class="tier-rank">
                <span class="tier-label">{ &tier.label }</span>
                <span class="tier-name">{ &tier.name }</span>
            </div>
            <div class="tier-entries">
                {
                    if tier.entries.is_empty() {
                        html! { <p class="tier-empty">{ "No entries in this tier." }</p> }
                    } else {
                        html! {
                            <>
                                { for tier.entries.iter().enumerate().map(|(index, entry)| {
                                    render_entry(entry, index, tier, drag_session, hover_counts)
                                }) }
                            </>
                        }
                    }
                }
            </div>
        </section>
    }
}

fn render_entry(
    entry: &Entry,
    index: usize,
    tier: &Tier,
    drag_session: &UseStateHandle<Option<DragSession>>,
    hover_counts: &UseStateHandle<HashMap<String, i32>>,
) -> Html {
    let dragging = (&**drag_session)
        .as_ref()
        .map(|session| session.entry.id == entry.id)
        .unwrap_or(false);

    let ondragstart = {
        let drag_session = drag_session.clone();
        let session = DragSession::new(entry.clone(), tier.label.clone(), index);
        Callback::from(move |event: DragEvent| {
            if let Some(transfer) = event.data_transfer() {
                // Firefox requires setData before it starts the drag.
                let _ = transfer.set_data("text/plain", &session.entry.id);
                transfer.set_effect_allowed("move");
            }
            drag_session.set(Some(session.clone()));
        })
    };

    // Fires on every gesture end, including cancels and drops outside any
    // tier, so the session can never outlive the drag.
    let ondragend = {
        let drag_session = drag_session.clone();
        let hover_counts = hover_counts.clone();
        Callback::from(move |_: DragEvent| {
            drag_session.set(None);
            hover_counts.set(HashMap::new());
        })
    };

    let card_classes = classes!(
        "entry-card",
        if dragging { Some("dragging") } else { None }
    );

    html! {
        <article class={card_classes} key={entry.id.clone()}
            draggable="true" ondragstart={ondragstart} ondragend={ondragend}>
            <p class="entry-name">{ &entry.name }</p>
            {
                match &entry.explanation {
                    Some(explanation) => html! { <p class="entry-explanation">{ explanation }</p> },
                    None => html! {},
                }
            }
        </article>
    }
}

fn resolve_selection(guides: &[GuideInfo], previous: Option<String>) -> Option<String> {
    match previous {
        Some(current) => {
            if guides.iter().any(|info| info.id == current) {
                Some(current)
            } else {
                guides.first().map(|info| info.id.clone())
            }
        }
        None => guides.first().map(|info| info.id.clone()),
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
