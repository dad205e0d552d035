use maud::{html, Markup, DOCTYPE};

use crate::models::{Block, Cell, Container, Page, Row, Style, Table};

const CONTAINER_CLASS: &str = "table_basics_com_cont_area";
const SUMMARY_CLASS: &str = "form_table";

/// Renders the page as a standalone HTML document.
pub fn render_page(page: &Page) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ko" {
            head {
                meta charset="UTF-8";
                title { "duesort" }
            }
            body {
                @if let Some(summary) = &page.summary {
                    div class=(SUMMARY_CLASS) {
                        (render_table(summary))
                    }
                }
                @if let Some(container) = &page.assignment_list {
                    (render_container(container))
                }
            }
        }
    }
}

pub fn render_container(container: &Container) -> Markup {
    html! {
        div class=(CONTAINER_CLASS) {
            @for block in &container.blocks {
                @match block {
                    Block::Heading(heading) => {
                        h3 style=[style_attr(&heading.style)] { (heading.text) }
                    }
                    Block::Table(table) => {
                        (render_table(table))
                    }
                }
            }
        }
    }
}

fn render_table(table: &Table) -> Markup {
    html! {
        table {
            @if !table.head.is_empty() {
                thead {
                    @for row in &table.head {
                        (render_row(row))
                    }
                }
            }
            @if let Some(body) = &table.body {
                tbody {
                    @for row in body {
                        (render_row(row))
                    }
                }
            }
        }
    }
}

fn render_row(row: &Row) -> Markup {
    html! {
        tr style=[style_attr(&row.style)] {
            @for cell in &row.cells {
                (render_cell(cell))
            }
        }
    }
}

fn render_cell(cell: &Cell) -> Markup {
    let class = (!cell.classes.is_empty()).then(|| cell.classes.join(" "));
    html! {
        @if cell.header {
            th class=[class] style=[style_attr(&cell.style)] { (cell.text) }
        } @else {
            td class=[class] style=[style_attr(&cell.style)] { (cell.text) }
        }
    }
}

fn style_attr(style: &Style) -> Option<String> {
    (!style.is_empty()).then(|| style.to_css())
}
