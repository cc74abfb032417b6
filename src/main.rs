//! Main module for the interval timer application using Yew.
//! Wires UI components, the shared `Timer`, and the one-second ticker.

use gloo_timers::callback::{Interval, Timeout};
use interval_timer::config::{COMPLETION_SOUND_MS, TICK_MS};
use interval_timer::sound::{HtmlAudioPlayer, Silent};
use interval_timer::storage::{LocalStorage, MemoryStore};
use interval_timer::{AlarmId, Mode, SoundPlayer, StateStore, Status, Timer, TimerEvent};
use log::{debug, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

mod components;
mod hooks;

use components::{
    AlarmList, ClockDisplay, Controls, DurationInputs, FullscreenView, ModeToggle, PresetButtons,
};
use hooks::use_duration_fields;

// ──────────────────────────────────────────────────────────────────────────────
type AppTimer = Timer<Box<dyn StateStore>, Box<dyn SoundPlayer>>;
type SharedTimer = Rc<RefCell<AppTimer>>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Build the timer over localStorage and `<audio>`, falling back to a
/// session-only store and silence when either is unavailable.
fn build_timer() -> AppTimer {
    let store: Box<dyn StateStore> = match LocalStorage::new() {
        Ok(s) => Box::new(s),
        Err(e) => {
            warn!("{}; state will not survive a reload", e);
            Box::new(MemoryStore::new())
        }
    };
    let sound: Box<dyn SoundPlayer> = match HtmlAudioPlayer::new() {
        Some(p) => Box::new(p),
        None => {
            warn!("Audio unavailable; alarms will be silent");
            Box::new(Silent)
        }
    };
    Timer::load(store, sound)
}

/// Show a blocking prompt.
fn prompt(message: &str) {
    if let Err(e) = gloo_utils::window().alert_with_message(message) {
        warn!("Could not show prompt '{}': {:?}", message, e);
    }
}

/// Run one tick and schedule the completion sound to stop after a while.
fn run_tick(timer: &SharedTimer, completion_stop: &Rc<RefCell<Option<Timeout>>>) {
    let events = timer.borrow_mut().tick();
    if events.contains(&TimerEvent::Completed) {
        let timer = timer.clone();
        let handle = Timeout::new(COMPLETION_SOUND_MS, move || {
            timer.borrow_mut().silence();
        });
        *completion_stop.borrow_mut() = Some(handle);
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    let timer: SharedTimer = use_mut_ref(build_timer);
    let completion_stop = use_mut_ref(|| None::<Timeout>);
    let fullscreen = use_state(|| false);
    let force_update = use_force_update();

    let duration = use_duration_fields();
    let alarm_fields = use_duration_fields();

    let (status, mode, time, alarms) = {
        let t = timer.borrow();
        (t.status(), t.mode(), t.display(), Rc::new(t.alarms().to_vec()))
    };
    let running = status == Status::Running;

    // The ticker lives exactly as long as the timer is running.
    {
        let timer = timer.clone();
        let completion_stop = completion_stop.clone();
        let force_update = force_update.clone();
        use_effect_with(running, move |&running| {
            let interval = running.then(|| {
                Interval::new(TICK_MS, move || {
                    run_tick(&timer, &completion_stop);
                    force_update.force_update();
                })
            });
            move || drop(interval)
        });
    }

    // Escape leaves fullscreen.
    {
        let fullscreen = fullscreen.clone();
        use_effect_with(*fullscreen, move |&active| {
            let listener = active.then(|| {
                let fullscreen = fullscreen.clone();
                let closure = Closure::<dyn Fn(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                    if e.key() == "Escape" {
                        fullscreen.set(false);
                    }
                });
                if let Err(e) = gloo_utils::document()
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                {
                    warn!("Could not listen for Escape: {:?}", e);
                }
                closure
            });
            move || {
                if let Some(closure) = listener {
                    let _ = gloo_utils::document().remove_event_listener_with_callback(
                        "keydown",
                        closure.as_ref().unchecked_ref(),
                    );
                }
            }
        });
    }

    let on_start = {
        let timer = timer.clone();
        let force_update = force_update.clone();
        let pending = duration.total_seconds();
        Callback::from(move |_: MouseEvent| {
            let result = timer.borrow_mut().start(pending);
            if let Err(e) = result {
                match e.prompt() {
                    Some(msg) => prompt(msg),
                    None => debug!("Start ignored: {}", e),
                }
            }
            force_update.force_update();
        })
    };

    let on_pause = {
        let timer = timer.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: MouseEvent| {
            if let Err(e) = timer.borrow_mut().pause() {
                debug!("Pause ignored: {}", e);
            }
            force_update.force_update();
        })
    };

    let on_reset = {
        let timer = timer.clone();
        let completion_stop = completion_stop.clone();
        let fullscreen = fullscreen.clone();
        let duration = duration.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: MouseEvent| {
            completion_stop.borrow_mut().take();
            timer.borrow_mut().reset();
            fullscreen.set(false);
            duration.clear();
            force_update.force_update();
        })
    };

    let on_mode = {
        let timer = timer.clone();
        let completion_stop = completion_stop.clone();
        let fullscreen = fullscreen.clone();
        let duration = duration.clone();
        let force_update = force_update.clone();
        Callback::from(move |mode: Mode| {
            let result = timer.borrow_mut().switch_mode(mode);
            match result {
                Ok(()) => {
                    completion_stop.borrow_mut().take();
                    fullscreen.set(false);
                    duration.clear();
                }
                Err(e) => debug!("Mode switch ignored: {}", e),
            }
            force_update.force_update();
        })
    };

    let on_preset = {
        let timer = timer.clone();
        let duration = duration.clone();
        let force_update = force_update.clone();
        Callback::from(move |seconds: u32| {
            timer.borrow_mut().apply_preset(seconds);
            duration.set_seconds(seconds);
            force_update.force_update();
        })
    };

    let on_add_alarm = {
        let timer = timer.clone();
        let alarm_fields = alarm_fields.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            let result = timer.borrow_mut().add_alarm(alarm_fields.total_seconds());
            match result {
                Ok(_) => alarm_fields.clear(),
                Err(e) => match e.prompt() {
                    Some(msg) => prompt(msg),
                    None => debug!("Alarm not added: {}", e),
                },
            }
            force_update.force_update();
        })
    };

    let on_alarm_keypress = {
        let on_add_alarm = on_add_alarm.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                on_add_alarm.emit(());
            }
        })
    };

    let on_remove_alarm = {
        let timer = timer.clone();
        let force_update = force_update.clone();
        Callback::from(move |id: AlarmId| {
            if let Err(e) = timer.borrow_mut().remove_alarm(id) {
                warn!("{}", e);
            }
            force_update.force_update();
        })
    };

    let on_acknowledge = {
        let timer = timer.clone();
        let completion_stop = completion_stop.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            completion_stop.borrow_mut().take();
            timer.borrow_mut().acknowledge();
            force_update.force_update();
        })
    };

    let on_display_click = {
        let on_acknowledge = on_acknowledge.clone();
        Callback::from(move |_: MouseEvent| {
            if status == Status::Expired {
                on_acknowledge.emit(());
            }
        })
    };

    let on_fullscreen = {
        let fullscreen = fullscreen.clone();
        Callback::from(move |_: MouseEvent| fullscreen.set(true))
    };

    let on_exit_fullscreen = {
        let fullscreen = fullscreen.clone();
        Callback::from(move |_: MouseEvent| fullscreen.set(false))
    };

    html! {
        <div class="container">
            <h1>{ "Interval Timer" }</h1>

            <ModeToggle {mode} disabled={running} on_select={on_mode} />

            <ClockDisplay {time} {status} onclick={on_display_click} />

            <DurationInputs title="Set Time" fields={duration.clone()} disabled={running} />

            <PresetButtons on_select={on_preset} />

            <Controls
                {status}
                {on_start}
                {on_pause}
                {on_reset}
                {on_fullscreen}
            />

            <div class="alarms-section">
                <DurationInputs
                    title="Interval Alarms"
                    fields={alarm_fields.clone()}
                    onkeypress={Some(on_alarm_keypress)}
                />
                <button class="btn add-alarm" onclick={on_add_alarm.reform(|_: MouseEvent| ())}>
                    { "Add Alarm" }
                </button>
                <AlarmList {alarms} on_remove={on_remove_alarm} />
            </div>

            if *fullscreen {
                <FullscreenView
                    {time}
                    {mode}
                    expired={status == Status::Expired}
                    on_exit={on_exit_fullscreen}
                    {on_acknowledge}
                />
            }
        </div>
    }
}

/// Entry point: installs logging and the panic hook, then renders the app.
fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
