use crate::domain::PipelineStage;
use crate::pipeline::{BoardStats, PipelineBoard};
use crate::templates::{card, components::kanban_column, desktop_layout};
use maud::{html, Markup, PreEscaped};

// The drop target sent to the server is the raw id under the pointer: a
// card id or a column's stage id.
const DRAG_SCRIPT: &str = r#"
document.addEventListener('dragstart', e => {
  const card = e.target.closest('[data-lead-id]');
  if (card) e.dataTransfer.setData('text/plain', card.dataset.leadId);
});
document.addEventListener('dragover', e => {
  if (e.target.closest('[data-stage]')) e.preventDefault();
});
document.addEventListener('drop', e => {
  const over = e.target.closest('[data-lead-id],[data-stage]');
  const id = e.dataTransfer.getData('text/plain');
  if (!id) return;
  e.preventDefault();
  const form = document.createElement('form');
  form.method = 'post';
  form.action = '/crm/drop';
  const fields = { leadId: id, target: over ? (over.dataset.leadId || over.dataset.stage) : '' };
  for (const [name, value] of Object.entries(fields)) {
    const input = document.createElement('input');
    input.type = 'hidden';
    input.name = name;
    input.value = value;
    form.appendChild(input);
  }
  document.body.appendChild(form);
  form.submit();
});
"#;

pub fn crm_page(board: &PipelineBoard) -> Markup {
    let stats = BoardStats::from_board(board);

    desktop_layout(
        "CRM",
        html! {
            main class="container wide" {
                div class="flex items-center justify-between" {
                    div {
                        h1 { "CRM MIMI" }
                        p { "Gestión de Leads y Oportunidades" }
                    }
                    a href="/crm" class="button" { "Actualizar" }
                }

                div class="stats" {
                    (card("Total Leads", html! {
                        div class="figure" { (stats.total_leads) }
                        p { "leads activos" }
                    }))
                    (card("Valor Total", html! {
                        div class="figure" { "$" (format!("{:.0}", stats.total_value)) }
                        p { "valor estimado" }
                    }))
                    (card("Conversión", html! {
                        div class="figure" { (stats.conversion_rate_label()) "%" }
                        p { "tasa de conversión" }
                    }))
                }

                @if board.is_empty() {
                    p class="empty" { "Todavía no hay leads en el pipeline." }
                }
                div class="kanban" {
                    @for stage in PipelineStage::ALL {
                        (kanban_column(stage, board.bucket(stage)))
                    }
                }
            }
            script { (PreEscaped(DRAG_SCRIPT)) }
        },
    )
}
