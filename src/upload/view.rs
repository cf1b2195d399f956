//! Upload form and result dialog markup.

use super::{FILE_FIELD, ImportOutcome, PROJECT_NAME_FIELD, UploadForm};
use crate::error::ImportError;
use crate::layout::escape_html;

/// Route the browser form posts to.
pub const FORM_ACTION: &str = "/imports/excel";

/// Element the result dialog is swapped into.
pub const DIALOG_SLOT_ID: &str = "import-dialog";

const DIALOG_ID: &str = "import-result";

/// Render the upload form followed by the dialog slot.
///
/// `dialog` is placed inside the slot; pass `""` for a fresh page. The form
/// works as a plain multipart POST and, when HTMX is loaded, as an in-page
/// request that drops overlapping submits.
pub fn render_form(form: &UploadForm, dialog: &str) -> String {
    format!(
        r##"<form id="upload-form" action="{FORM_ACTION}" method="post" enctype="multipart/form-data"
      hx-post="{FORM_ACTION}" hx-encoding="multipart/form-data"
      hx-target="#{DIALOG_SLOT_ID}" hx-swap="innerHTML"
      hx-sync="this:drop" hx-disabled-elt="find button"
      style="display:flex;gap:10px;align-items:center">
    <input name="{PROJECT_NAME_FIELD}" value="{name}" placeholder="Nombre del proyecto">
    <input type="file" name="{FILE_FIELD}">
    <button type="submit">Importar Excel</button>
</form>
<div id="{DIALOG_SLOT_ID}">{dialog}</div>"##,
        name = escape_html(form.project_name()),
    )
}

/// Modal dialog showing the raw JSON answer.
pub fn render_result_dialog(outcome: &ImportOutcome) -> String {
    modal_dialog("", &outcome.display())
}

/// Modal dialog describing a failed import.
pub fn render_error_dialog(error: &ImportError) -> String {
    modal_dialog(
        "<strong>Error en la importación</strong>",
        &error.to_string(),
    )
}

fn modal_dialog(heading: &str, text: &str) -> String {
    format!(
        r#"<dialog id="{DIALOG_ID}" style="max-width:40rem">
    {heading}
    <pre style="white-space:pre-wrap">{text}</pre>
    <form method="dialog"><button>Aceptar</button></form>
</dialog>
<script>document.getElementById("{DIALOG_ID}").showModal();</script>"#,
        text = escape_html(text),
    )
}
