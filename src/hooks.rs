use log::warn;
use marathon_form::{
    submit_application, Field, FormController, FormErrors, FormValues, Level, Phase, Photo,
    PhotoToken, TextField, Transport,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;
use yew::functional::UseForceUpdateHandle;
use yew::prelude::*;

/// Render-time view of the application form plus the callbacks that drive it.
#[derive(Clone)]
pub struct ApplicationForm {
    /// Current field values.
    pub values: FormValues,
    /// Errors from the last submit attempt, minus any cleared on focus.
    pub errors: FormErrors,
    pub phase: Phase,
    /// True while a submission is in flight.
    pub loading: bool,
    /// Name of the attached (or still loading) photo.
    pub attachment_name: Option<String>,
    pub attachment_size: Option<usize>,
    /// Pretty-printed snapshot of a successful submission.
    pub confirmation: Option<String>,
    /// Banner text for a failed submission.
    pub transport_error: Option<String>,
    pub on_text_input: Callback<(TextField, String)>,
    pub on_focus: Callback<Field>,
    pub on_age: Callback<u8>,
    pub on_level: Callback<Level>,
    pub on_photo_selected: Callback<File>,
    pub on_photo_removed: Callback<()>,
    pub on_submit: Callback<SubmitEvent>,
    pub on_dismiss: Callback<()>,
}

/// Read a selected file into memory.
async fn read_photo(file: &File) -> Result<Photo, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(Photo::new(file.name(), file.type_(), bytes))
}

/// Wrap a synchronous controller mutation in a callback that re-renders.
fn mutate<T: 'static>(
    controller: &Rc<RefCell<FormController>>,
    update: &UseForceUpdateHandle,
    f: impl Fn(&mut FormController, T) + 'static,
) -> Callback<T> {
    let controller = controller.clone();
    let update = update.clone();
    Callback::from(move |arg: T| {
        f(&mut controller.borrow_mut(), arg);
        update.force_update();
    })
}

/// Custom hook owning the form controller for one page visit.
#[hook]
pub fn use_application_form(transport: Rc<dyn Transport>) -> ApplicationForm {
    let controller = use_mut_ref(FormController::new);
    let update = use_force_update();

    let on_text_input = mutate(&controller, &update, |form, (field, value): (TextField, String)| {
        form.set_text(field, value)
    });
    let on_focus = mutate(&controller, &update, |form, field: Field| form.focus(field));
    let on_age = mutate(&controller, &update, |form, age: u8| form.set_age(age));
    let on_level = mutate(&controller, &update, |form, level: Level| {
        form.set_level(level)
    });
    let on_photo_removed = mutate(&controller, &update, |form, _: ()| form.remove_photo());
    let on_dismiss = mutate(&controller, &update, |form, _: ()| form.dismiss_result());

    let on_photo_selected = {
        let controller = controller.clone();
        let update = update.clone();
        Callback::from(move |file: File| {
            let token: PhotoToken = controller.borrow_mut().begin_photo_read(file.name());
            update.force_update();

            let controller = controller.clone();
            let update = update.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match read_photo(&file).await {
                    Ok(photo) => {
                        if controller.borrow_mut().complete_photo_read(token, photo) {
                            update.force_update();
                        }
                    }
                    Err(e) => {
                        warn!("Could not read {}: {:?}", file.name(), e);
                        controller.borrow_mut().abandon_photo_read(token);
                        update.force_update();
                    }
                }
            });
        })
    };

    let on_submit = {
        let controller = controller.clone();
        let update = update.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let controller = controller.clone();
            let update = update.clone();
            let transport = transport.clone();
            wasm_bindgen_futures::spawn_local(async move {
                submit_application(&controller, transport.as_ref(), || update.force_update())
                    .await;
            });
        })
    };

    let form = controller.borrow();
    ApplicationForm {
        values: form.values().clone(),
        errors: form.errors().clone(),
        phase: form.phase(),
        loading: form.is_loading(),
        attachment_name: form.attachment_name().map(str::to_string),
        attachment_size: form.attachment_size(),
        confirmation: form
            .confirmation()
            .and_then(|snapshot| serde_json::to_string_pretty(snapshot).ok()),
        transport_error: form
            .transport_error()
            .map(|e| format!("Could not send application: {}", e)),
        on_text_input,
        on_focus,
        on_age,
        on_level,
        on_photo_selected,
        on_photo_removed,
        on_submit,
        on_dismiss,
    }
}
