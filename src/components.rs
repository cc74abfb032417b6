//! Pure Yew view components for the timer UI.
//!
//! This module contains stateless components that render based on props;
//! all state lives in the `Timer` held by the main component.

use crate::hooks::{DurationFields, NumericField};
use interval_timer::config::PRESETS;
use interval_timer::utils::{format_hms, pad2};
use interval_timer::{Alarm, AlarmId, DisplayTime, Mode, Status};
use std::rc::Rc;
use yew::prelude::*;

fn hidden_unless(visible: bool) -> Option<&'static str> {
    (!visible).then_some("hidden")
}

/// Renders `HH:MM:SS`, hiding leading zero segments.
fn render_segments(time: DisplayTime, digit_class: &'static str, sep_class: &'static str) -> Html {
    html! {
        <>
            <span class={classes!(digit_class, hidden_unless(time.show_hours()))}>{ pad2(time.hours) }</span>
            <span class={classes!(sep_class, hidden_unless(time.show_hours()))}>{ ":" }</span>
            <span class={classes!(digit_class, hidden_unless(time.show_minutes()))}>{ pad2(time.minutes) }</span>
            <span class={classes!(sep_class, hidden_unless(time.show_minutes()))}>{ ":" }</span>
            <span class={digit_class}>{ pad2(time.seconds) }</span>
        </>
    }
}

fn status_class(status: Status) -> Option<&'static str> {
    match status {
        Status::Running => Some("running"),
        Status::Expired => Some("expired"),
        Status::Paused | Status::Idle => None,
    }
}

#[derive(Properties, PartialEq)]
pub struct ClockDisplayProps {
    pub time: DisplayTime,
    pub status: Status,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(ClockDisplay)]
pub fn clock_display(props: &ClockDisplayProps) -> Html {
    html! {
        <div class={classes!("timer-display", status_class(props.status))}
             onclick={props.onclick.clone()}>
            { render_segments(props.time, "time-segment", "separator") }
        </div>
    }
}

/// Count down / count up selector.
#[derive(Properties, PartialEq)]
pub struct ModeToggleProps {
    pub mode: Mode,
    /// Mode changes are refused while the timer runs.
    pub disabled: bool,
    pub on_select: Callback<Mode>,
}

#[function_component(ModeToggle)]
pub fn mode_toggle(props: &ModeToggleProps) -> Html {
    let button = |mode: Mode, label: &'static str| {
        let on_select = props.on_select.clone();
        let active = (props.mode == mode).then_some("active");
        html! {
            <button class={classes!("mode-btn", active)}
                    disabled={props.disabled}
                    onclick={Callback::from(move |_| on_select.emit(mode))}>
                { label }
            </button>
        }
    };

    html! {
        <div class="mode-toggle">
            { button(Mode::CountDown, "Count Down") }
            { button(Mode::CountUp, "Count Up") }
        </div>
    }
}

fn render_field(
    field: &NumericField,
    label: &'static str,
    max: &'static str,
    disabled: bool,
    onkeypress: Option<Callback<KeyboardEvent>>,
) -> Html {
    html! {
        <div class="input-field">
            <input type="number"
                min="0"
                max={max}
                value={field.text.clone()}
                disabled={disabled}
                oninput={field.on_input.clone()}
                onkeypress={onkeypress}
            />
            <label>{ label }</label>
        </div>
    }
}

/// Three numeric fields for hours, minutes and seconds.
#[derive(Properties, PartialEq)]
pub struct DurationInputsProps {
    pub title: AttrValue,
    pub fields: DurationFields,
    #[prop_or_default]
    pub disabled: bool,
    #[prop_or_default]
    pub onkeypress: Option<Callback<KeyboardEvent>>,
}

#[function_component(DurationInputs)]
pub fn duration_inputs(props: &DurationInputsProps) -> Html {
    let f = &props.fields;
    html! {
        <div class="form-group">
            <h3>{ props.title.clone() }</h3>
            <div class="time-inputs">
                { render_field(&f.hours, "Hours", "99", props.disabled, props.onkeypress.clone()) }
                { render_field(&f.minutes, "Minutes", "59", props.disabled, props.onkeypress.clone()) }
                { render_field(&f.seconds, "Seconds", "59", props.disabled, props.onkeypress.clone()) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PresetButtonsProps {
    pub on_select: Callback<u32>,
}

#[function_component(PresetButtons)]
pub fn preset_buttons(props: &PresetButtonsProps) -> Html {
    html! {
        <div class="presets">
            { PRESETS.iter().map(|&(label, seconds)| {
                let on_select = props.on_select.clone();
                html! {
                    <button class="preset-btn" onclick={Callback::from(move |_| on_select.emit(seconds))}>
                        { label }
                    </button>
                }
            }).collect::<Html>() }
        </div>
    }
}

/// Start / Pause / Reset / Fullscreen. Enablement follows the status.
#[derive(Properties, PartialEq)]
pub struct ControlsProps {
    pub status: Status,
    pub on_start: Callback<MouseEvent>,
    pub on_pause: Callback<MouseEvent>,
    pub on_reset: Callback<MouseEvent>,
    pub on_fullscreen: Callback<MouseEvent>,
}

#[function_component(Controls)]
pub fn controls(props: &ControlsProps) -> Html {
    let running = props.status == Status::Running;
    html! {
        <div class="controls">
            <button class="btn start" disabled={running} onclick={props.on_start.clone()}>{ "Start" }</button>
            <button class="btn pause" disabled={!running} onclick={props.on_pause.clone()}>{ "Pause" }</button>
            <button class="btn reset" onclick={props.on_reset.clone()}>{ "Reset" }</button>
            <button class="btn fullscreen" disabled={!running} onclick={props.on_fullscreen.clone()}>{ "Fullscreen" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AlarmListProps {
    pub alarms: Rc<Vec<Alarm>>,
    pub on_remove: Callback<AlarmId>,
}

#[function_component(AlarmList)]
pub fn alarm_list(props: &AlarmListProps) -> Html {
    if props.alarms.is_empty() {
        return html! {
            <div class="alarms-list">
                <p class="no-alarms">{ "No alarms set" }</p>
            </div>
        };
    }

    html! {
        <div class="alarms-list">
            { props.alarms.iter().map(|alarm| {
                let id = alarm.id;
                let on_remove = props.on_remove.clone();
                let triggered = alarm.triggered.then_some("triggered");
                html! {
                    <div key={id.0} class={classes!("alarm-item", triggered)}>
                        <div>
                            <span class="alarm-time">{ format_hms(alarm.target_seconds) }</span>
                            <span class="alarm-status">
                                { if alarm.triggered { "✓ Triggered" } else { "Pending" } }
                            </span>
                        </div>
                        <button class="remove-alarm-btn" onclick={Callback::from(move |_| on_remove.emit(id))}>
                            { "Remove" }
                        </button>
                    </div>
                }
            }).collect::<Html>() }
        </div>
    }
}

/// Full-window clock overlay.
#[derive(Properties, PartialEq)]
pub struct FullscreenViewProps {
    pub time: DisplayTime,
    pub mode: Mode,
    pub expired: bool,
    pub on_exit: Callback<MouseEvent>,
    /// Clicking the backdrop while expired silences the alarm.
    pub on_acknowledge: Callback<()>,
}

#[function_component(FullscreenView)]
pub fn fullscreen_view(props: &FullscreenViewProps) -> Html {
    let onclick = {
        let on_acknowledge = props.on_acknowledge.clone();
        let expired = props.expired;
        Callback::from(move |e: MouseEvent| {
            // Only clicks on the backdrop itself, not on children.
            if expired && e.target() == e.current_target() {
                on_acknowledge.emit(());
            }
        })
    };

    html! {
        <div class={classes!("fullscreen-view", "active", props.expired.then_some("expired"))} {onclick}>
            <div class="fullscreen-mode">{ props.mode.label() }</div>
            <div class="fullscreen-time">
                { render_segments(props.time, "fullscreen-digit", "fullscreen-separator") }
            </div>
            <button class="exit-fullscreen-btn" onclick={props.on_exit.clone()}>{ "Exit" }</button>
        </div>
    }
}
