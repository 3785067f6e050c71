//! View components for the application form.
//!
//! Every widget renders from props and reports changes upward through
//! callbacks; the form controller owns the values.

use marathon_form::{format_file_size, indicator_offset, indicator_step};
use web_sys::{File, HtmlElement, HtmlInputElement};
use yew::prelude::*;

/// Inline error line rendered under a field. Renders nothing when empty.
#[derive(Properties, PartialEq)]
pub struct ErrorMessageProps {
    pub message: AttrValue,
}

#[function_component(ErrorMessage)]
pub fn error_message(props: &ErrorMessageProps) -> Html {
    if props.message.is_empty() {
        return html! {};
    }
    html! {
        <div class="input-error" role="alert">
            <span class="input-error-icon">{ "!" }</span>
            { props.message.clone() }
        </div>
    }
}

fn field_class(base: &'static str, error: &AttrValue) -> Classes {
    classes!(base, (!error.is_empty()).then_some("invalid"))
}

/// Single-line text input with label and error text.
#[derive(Properties, PartialEq)]
pub struct TextInputProps {
    pub name: AttrValue,
    pub label: AttrValue,
    pub value: AttrValue,
    #[prop_or_default]
    pub error: AttrValue,
    pub oninput: Callback<String>,
    pub onfocus: Callback<()>,
}

#[function_component(TextInput)]
pub fn text_input(props: &TextInputProps) -> Html {
    let oninput = props.oninput.reform(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.value()
    });
    let onfocus = props.onfocus.reform(|_: FocusEvent| ());

    html! {
        <div class="form-group text-field">
            <label for={props.name.clone()}>{ props.label.clone() }</label>
            <input
                type="text"
                id={props.name.clone()}
                name={props.name.clone()}
                value={props.value.clone()}
                class={field_class("text-input", &props.error)}
                {oninput}
                {onfocus}
            />
            <ErrorMessage message={props.error.clone()} />
        </div>
    }
}

/// Numeric slider with a floating value indicator.
#[derive(Properties, PartialEq)]
pub struct RangeInputProps {
    pub name: AttrValue,
    pub label: AttrValue,
    pub min: u8,
    pub max: u8,
    pub value: u8,
    #[prop_or_default]
    pub error: AttrValue,
    pub onchange: Callback<u8>,
    pub onfocus: Callback<()>,
}

#[function_component(RangeInput)]
pub fn range_input(props: &RangeInputProps) -> Html {
    let track = use_node_ref();
    let step = use_state(|| 0.0_f64);

    // Measured once on mount; the indicator does not follow later resizes.
    {
        let track = track.clone();
        let step = step.clone();
        let max = props.max;
        use_effect_with((), move |_| {
            if let Some(el) = track.cast::<HtmlElement>() {
                step.set(indicator_step(el.offset_width() as f64, max));
            }
            || ()
        });
    }

    let oninput = props.onchange.reform(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.value().parse::<u8>().unwrap_or_default()
    });
    let onfocus = props.onfocus.reform(|_: FocusEvent| ());
    let offset = indicator_offset(props.value, *step);

    html! {
        <div class="form-group range-field">
            <label for={props.name.clone()}>{ props.label.clone() }</label>
            <div class="range-bounds">
                <span>{ props.min }</span>
                <span>{ props.max }</span>
            </div>
            <input
                ref={track}
                type="range"
                id={props.name.clone()}
                name={props.name.clone()}
                min={props.min.to_string()}
                max={props.max.to_string()}
                value={props.value.to_string()}
                class="range-input"
                {oninput}
                {onfocus}
            />
            <span class="range-indicator" style={format!("transform: translateX({}px)", offset)}>
                { props.value }
            </span>
            <ErrorMessage message={props.error.clone()} />
        </div>
    }
}

/// Single-file picker with click and drag-and-drop selection.
#[derive(Properties, PartialEq)]
pub struct FileInputProps {
    pub name: AttrValue,
    pub label: AttrValue,
    /// Name of the attached file, if any.
    #[prop_or_default]
    pub file_name: Option<AttrValue>,
    /// Size of the attached file once it has been read.
    #[prop_or_default]
    pub file_size: Option<usize>,
    #[prop_or_default]
    pub error: AttrValue,
    pub onselect: Callback<File>,
    pub onremove: Callback<()>,
}

#[function_component(FileInput)]
pub fn file_input(props: &FileInputProps) -> Html {
    let picker = use_node_ref();
    let dragging = use_state(|| false);

    let onchange = {
        let onselect = props.onselect.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(file) = input.files().and_then(|files| files.get(0)) {
                onselect.emit(file);
            }
            // Allow picking the same file again after a removal.
            input.set_value("");
        })
    };

    let onclick = {
        let picker = picker.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = picker.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };

    let ondragover = {
        let dragging = dragging.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            dragging.set(true);
        })
    };

    let ondragleave = {
        let dragging = dragging.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            dragging.set(false);
        })
    };

    let ondrop = {
        let dragging = dragging.clone();
        let onselect = props.onselect.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            e.stop_propagation();
            dragging.set(false);
            let files = e.data_transfer().and_then(|dt| dt.files());
            match files {
                Some(files) if files.length() == 1 => {
                    if let Some(file) = files.get(0) {
                        onselect.emit(file);
                    }
                }
                _ => log::debug!("Ignoring drop without exactly one file"),
            }
        })
    };

    let onremove = {
        let onremove = props.onremove.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            onremove.emit(());
        })
    };

    let class = classes!(
        field_class("file-drop", &props.error),
        (*dragging).then_some("dragging")
    );

    html! {
        <div class="form-group file-field">
            <label for={props.name.clone()}>{ props.label.clone() }</label>
            <button type="button" {class} {onclick} {ondragover} {ondragleave} {ondrop}>
                if let Some(name) = &props.file_name {
                    <span class="file-name">
                        { name.clone() }
                        if let Some(size) = props.file_size {
                            <span class="file-size">{ format!(" ({})", format_file_size(size)) }</span>
                        }
                        <span class="file-remove" title="Remove" onclick={onremove}>{ "✕" }</span>
                    </span>
                } else {
                    <span class="file-upload">{ "Upload a file" }</span>
                    <span class="file-hint">{ " or drag and drop here" }</span>
                }
                <input
                    ref={picker}
                    type="file"
                    id={props.name.clone()}
                    name={props.name.clone()}
                    class="hidden"
                    {onchange}
                />
            </button>
            <ErrorMessage message={props.error.clone()} />
        </div>
    }
}

/// Single-select radio group. The selected option always comes from props,
/// so exactly one option is checked.
#[derive(Properties, PartialEq)]
pub struct RadioInputProps {
    pub name: AttrValue,
    pub label: AttrValue,
    pub options: Vec<AttrValue>,
    pub value: AttrValue,
    pub onchange: Callback<String>,
}

#[function_component(RadioInput)]
pub fn radio_input(props: &RadioInputProps) -> Html {
    html! {
        <fieldset class="form-group radio-field">
            <legend>{ props.label.clone() }</legend>
            { props.options.iter().map(|option| {
                let onchange = props.onchange.reform(|e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    input.value()
                });
                let id = format!("{}-{}", props.name, option);
                html! {
                    <div class="radio-option" key={option.to_string()}>
                        <input
                            type="radio"
                            id={id.clone()}
                            name={props.name.clone()}
                            value={option.clone()}
                            checked={*option == props.value}
                            {onchange}
                        />
                        <label for={id}>{ option.clone() }</label>
                    </div>
                }
            }).collect::<Html>() }
        </fieldset>
    }
}

#[function_component(Spinner)]
pub fn spinner() -> Html {
    html! {
        <div class="spinner" role="status">
            <div></div><div></div><div></div><div></div>
            <span class="sr-only">{ "Loading..." }</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TransportBannerProps {
    pub message: AttrValue,
    pub ondismiss: Callback<()>,
}

/// Banner for a submission the transport could not deliver.
#[function_component(TransportBanner)]
pub fn transport_banner(props: &TransportBannerProps) -> Html {
    let onclick = props.ondismiss.reform(|_: MouseEvent| ());
    html! {
        <div class="transport-error" role="alert">
            <span>{ props.message.clone() }</span>
            <button type="button" class="btn-secondary small" {onclick}>{ "Dismiss" }</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfirmationProps {
    /// Pretty-printed JSON of the submitted values.
    pub snapshot: AttrValue,
    pub onclose: Callback<()>,
}

/// Shows what was sent after a successful submission.
#[function_component(Confirmation)]
pub fn confirmation(props: &ConfirmationProps) -> Html {
    let onclick = props.onclose.reform(|_: MouseEvent| ());
    html! {
        <div class="confirmation" role="dialog">
            <h2>{ "Application sent" }</h2>
            <pre class="confirmation-snapshot">{ props.snapshot.clone() }</pre>
            <button type="button" class="btn-primary" {onclick}>{ "Close" }</button>
        </div>
    }
}
