//! Main module for the Marathon application form using Yew.
//! Wires the field widgets to the form controller hook.

use marathon_form::{
    config::{MAX_AGE, MIN_AGE},
    Field, Level, Phase, SimulatedTransport, TextField, Transport,
};
use std::rc::Rc;
use yew::prelude::*;

mod components;
mod hooks;

use components::{
    Confirmation, FileInput, RadioInput, RangeInput, Spinner, TextInput, TransportBanner,
};
use hooks::{use_application_form, ApplicationForm};

/// Field name used for the input's `id`/`name` attributes.
fn input_name(field: TextField) -> &'static str {
    Field::from(field).name()
}

fn render_text_inputs(form: &ApplicationForm) -> Html {
    TextField::ALL
        .into_iter()
        .map(|field| {
            let oninput = form.on_text_input.reform(move |value: String| (field, value));
            let onfocus = form.on_focus.reform(move |_: ()| Field::from(field));
            html! {
                <TextInput
                    key={input_name(field)}
                    name={input_name(field)}
                    label={field.label()}
                    value={form.values.text(field).to_string()}
                    error={form.errors.message(field.into())}
                    {oninput}
                    {onfocus}
                />
            }
        })
        .collect()
}

#[function_component(Main)]
fn main_component() -> Html {
    let transport = use_memo((), |_| Rc::new(SimulatedTransport::default()) as Rc<dyn Transport>);
    let form = use_application_form((*transport).clone());

    let level_options: Vec<AttrValue> = Level::ALL
        .into_iter()
        .map(|level| AttrValue::from(level.as_str()))
        .collect();
    let on_level = {
        let filtered = form.on_level.filter_reform(|value: String| match value.parse::<Level>() {
            Ok(level) => Some(level),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        });
        Callback::from(move |value: String| {
            filtered.emit(value);
        })
    };

    html! {
        <div class="container">
            <h1>{ "Marathon Application Form" }</h1>

            if let Some(message) = form.transport_error.clone() {
                <TransportBanner {message} ondismiss={form.on_dismiss.clone()} />
            }

            <form class="application-form" onsubmit={form.on_submit.clone()}>
                <div class="text-fields">
                    { render_text_inputs(&form) }
                </div>

                <FileInput
                    name={Field::Photo.name()}
                    label="Photo"
                    file_name={form.attachment_name.clone().map(AttrValue::from)}
                    file_size={form.attachment_size}
                    error={form.errors.message(Field::Photo)}
                    onselect={form.on_photo_selected.clone()}
                    onremove={form.on_photo_removed.clone()}
                />

                <RangeInput
                    name={Field::Age.name()}
                    label="Age"
                    min={MIN_AGE}
                    max={MAX_AGE}
                    value={form.values.age}
                    error={form.errors.message(Field::Age)}
                    onchange={form.on_age.clone()}
                    onfocus={form.on_focus.reform(|_: ()| Field::Age)}
                />

                <RadioInput
                    name="level"
                    label="Level"
                    options={level_options}
                    value={form.values.level.as_str()}
                    onchange={on_level}
                />

                <button type="submit" class="btn-primary submit" disabled={form.loading}>
                    { if form.loading { "Sending..." } else { "Send Application" } }
                    if form.loading {
                        <Spinner />
                    }
                </button>
            </form>

            if form.phase == Phase::Done {
                if let Some(snapshot) = form.confirmation.clone() {
                    <Confirmation {snapshot} onclose={form.on_dismiss.clone()} />
                }
            }
        </div>
    }
}

/// App wrapper.
#[function_component]
pub fn App() -> Html {
    html! {
        <Main />
    }
}

/// Entry point: installs the panic hook and renders the App.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
