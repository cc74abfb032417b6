use interval_timer::config::{MAX_HOURS, MAX_MINUTES, MAX_SECONDS};
use interval_timer::utils::{hms_to_seconds, parse_clamped_field};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// State and callbacks for one numeric input field.
#[derive(Clone, PartialEq)]
pub struct NumericField {
    /// The current text content of the input field.
    pub text: String,
    /// Parsed value, clamped to the field's maximum.
    pub value: u32,
    /// Callback for the input's `oninput` event.
    pub on_input: Callback<InputEvent>,
    /// Callback to programmatically set the value.
    pub set_value: Callback<u32>,
}

/// Custom hook for a lenient numeric field in `0..=max`.
#[hook]
pub fn use_numeric_field(max: u32) -> NumericField {
    let text_state_handle: UseStateHandle<String> = use_state(|| "0".to_string());

    let on_input = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let set_value = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |new_val: u32| {
            text_setter.set(new_val.min(max).to_string());
        })
    };

    NumericField {
        value: parse_clamped_field(&text_state_handle, max),
        text: (*text_state_handle).clone(),
        on_input,
        set_value,
    }
}

/// Hours, minutes and seconds fields that together describe a duration.
#[derive(Clone, PartialEq)]
pub struct DurationFields {
    pub hours: NumericField,
    pub minutes: NumericField,
    pub seconds: NumericField,
}

impl DurationFields {
    pub fn total_seconds(&self) -> u32 {
        hms_to_seconds(self.hours.value, self.minutes.value, self.seconds.value)
    }

    /// Fill the fields from a number of seconds.
    pub fn set_seconds(&self, total: u32) {
        self.hours.set_value.emit(total / 3600);
        self.minutes.set_value.emit((total % 3600) / 60);
        self.seconds.set_value.emit(total % 60);
    }

    pub fn clear(&self) {
        self.set_seconds(0);
    }
}

/// Custom hook bundling the three fields of a duration input.
#[hook]
pub fn use_duration_fields() -> DurationFields {
    let hours = use_numeric_field(MAX_HOURS);
    let minutes = use_numeric_field(MAX_MINUTES);
    let seconds = use_numeric_field(MAX_SECONDS);
    DurationFields {
        hours,
        minutes,
        seconds,
    }
}
