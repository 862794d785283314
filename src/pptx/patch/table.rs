//! Table patch application.
//!
//! Applies externally supplied table edit specifications onto a parsed slide
//! document. Resolution is best-effort: a spec whose target cannot be
//! located through the full ancestor chain is skipped, and the caller
//! observes that only through a lower `updated` count. The returned document
//! shares every node off the edit path with the input by reference.
use crate::pptx::patch::text::{build_text_body, empty_text_body, CellContent};
use crate::xml::{XmlDocument, XmlElement, XmlNode};
use log::debug;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// One table edit specification, targeting a graphic frame by shape id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableUpdate {
    /// Nonvisual id of the target `p:graphicFrame`.
    pub shape_id: String,
    /// Replacement table style GUID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub update_cells: Vec<CellUpdate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_rows: Vec<RowInsert>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_rows: Vec<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_columns: Vec<ColumnInsert>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_columns: Vec<usize>,
}

/// Replace the content of one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    pub row: usize,
    pub col: usize,
    pub content: CellContent,
}

/// Insert a row, padded with empty cells up to the table's column count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowInsert {
    /// Row height in EMUs.
    pub height: i64,
    #[serde(default)]
    pub cells: Vec<CellContent>,
    /// Row index to insert at; appended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Insert a grid column plus an empty cell in every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInsert {
    /// Column width in EMUs.
    pub width: i64,
    /// Column index to insert at; appended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Result of a batch of table updates.
#[derive(Debug, Clone)]
pub struct TablePatchResult {
    /// The rebuilt document. With no applicable specs this shares every node
    /// with the input.
    pub doc: XmlDocument,
    /// Number of specs that resolved to a table and were applied. A spec
    /// with an empty edit payload still counts once its table resolves.
    pub updated: usize,
}

/// Apply a batch of table edit specifications to a slide document.
///
/// Specs are applied in order, each against the document as rebuilt by the
/// previous ones. Removal indices within one spec are sorted descending
/// before use, so callers need not pre-sort them.
pub fn apply_table_updates(doc: &XmlDocument, updates: &[TableUpdate]) -> TablePatchResult {
    let mut result = doc.clone();
    let mut updated = 0;

    for update in updates {
        match apply_one(&result, update) {
            Some(rebuilt) => {
                result = rebuilt;
                updated += 1;
            },
            None => {
                debug!(
                    "table update for shape id {:?} did not resolve to a table; skipped",
                    update.shape_id
                );
            },
        }
    }

    TablePatchResult { doc: result, updated }
}

/// Resolve one spec through the ancestor chain and rebuild the document
/// around the edited table. Returns `None` when any hop is missing.
fn apply_one(doc: &XmlDocument, update: &TableUpdate) -> Option<XmlDocument> {
    let sld = doc.child("p:sld")?;
    let c_sld = sld.child("p:cSld")?;
    let sp_tree = c_sld.child("p:spTree")?;
    let frame = sp_tree
        .children_named("p:graphicFrame")
        .find(|frame| frame_shape_id(frame) == Some(update.shape_id.as_str()))?;
    let graphic = frame.child("a:graphic")?;
    let graphic_data = graphic.child("a:graphicData")?;
    let tbl = graphic_data.child("a:tbl")?;

    let new_tbl = Rc::new(edit_table(tbl, update));

    // Rebuild the spine bottom-up; unrelated siblings at every level are
    // carried over by reference.
    let new_graphic_data = Rc::new(graphic_data.with_child_replaced(tbl, new_tbl));
    let new_graphic = Rc::new(graphic.with_child_replaced(graphic_data, new_graphic_data));
    let new_frame = Rc::new(frame.with_child_replaced(graphic, new_graphic));
    let new_sp_tree = Rc::new(sp_tree.with_child_replaced(frame, new_frame));
    let new_c_sld = Rc::new(c_sld.with_child_replaced(sp_tree, new_sp_tree));
    let new_sld = Rc::new(sld.with_child_replaced(c_sld, new_c_sld));
    Some(doc.with_child_replaced(sld, new_sld))
}

/// Read the nonvisual id of a graphic frame.
fn frame_shape_id(frame: &XmlElement) -> Option<&str> {
    frame.child("p:nvGraphicFramePr")?.child("p:cNvPr")?.attr("id")
}

/// Apply one spec's edits to a working copy of the matched table.
fn edit_table(tbl: &XmlElement, update: &TableUpdate) -> XmlElement {
    let mut children: Vec<XmlNode> = tbl.children.clone();

    if let Some(style_id) = &update.style_id {
        apply_style_id(&mut children, style_id);
    }
    for cell in &update.update_cells {
        update_cell(&mut children, cell);
    }

    let column_count = grid_column_count(&children);
    for insert in &update.add_rows {
        add_row(&mut children, insert, column_count);
    }
    remove_rows(&mut children, &update.remove_rows);
    for insert in &update.add_columns {
        add_column(&mut children, insert);
    }
    remove_columns(&mut children, &update.remove_columns);

    tbl.with_children(children)
}

/// Replace (or create) the table style GUID under `a:tblPr`.
fn apply_style_id(children: &mut Vec<XmlNode>, style_id: &str) {
    let style_el = XmlElement::new("a:tableStyleId").with_text(style_id);

    match children.iter().position(|n| n.is_element_named("a:tblPr")) {
        Some(pos) => {
            let Some(tbl_pr) = children[pos].as_element().map(Rc::clone) else {
                return;
            };
            let mut pr_children = tbl_pr.children.clone();
            match pr_children
                .iter()
                .position(|n| n.is_element_named("a:tableStyleId"))
            {
                Some(style_pos) => pr_children[style_pos] = style_el.into_node(),
                None => pr_children.push(style_el.into_node()),
            }
            children[pos] = XmlNode::Element(Rc::new(tbl_pr.with_children(pr_children)));
        },
        // tblPr leads the table's child list.
        None => {
            children.insert(0, XmlElement::new("a:tblPr").with_child(style_el).into_node());
        },
    }
}

/// Replace the text body of the cell at `{row, col}`. Out-of-range indices
/// are ignored.
fn update_cell(children: &mut [XmlNode], cell: &CellUpdate) {
    let rows = element_positions(children, "a:tr");
    let Some(&row_pos) = rows.get(cell.row) else { return };
    let Some(row) = children[row_pos].as_element().map(Rc::clone) else {
        return;
    };

    let cells = element_positions(&row.children, "a:tc");
    let Some(&cell_pos) = cells.get(cell.col) else { return };
    let Some(tc) = row.children[cell_pos].as_element().map(Rc::clone) else {
        return;
    };

    let mut tc_children = tc.children.clone();
    match tc_children
        .iter()
        .position(|n| n.is_element_named("a:txBody"))
    {
        Some(body_pos) => tc_children[body_pos] = build_text_body(&cell.content).into_node(),
        // The text body leads the cell's child list.
        None => tc_children.insert(0, build_text_body(&cell.content).into_node()),
    }

    let mut row_children = row.children.clone();
    row_children[cell_pos] = XmlNode::Element(Rc::new(tc.with_children(tc_children)));
    children[row_pos] = XmlNode::Element(Rc::new(row.with_children(row_children)));
}

/// Insert a new row, padded with empty cells up to `column_count`.
fn add_row(children: &mut Vec<XmlNode>, insert: &RowInsert, column_count: usize) {
    let mut row = XmlElement::new("a:tr").with_attr("h", insert.height.to_string());
    for content in &insert.cells {
        row = row.with_child(filled_cell(content));
    }
    for _ in insert.cells.len()..column_count {
        row = row.with_child(empty_cell());
    }

    let rows = element_positions(children, "a:tr");
    let child_pos = match insert.position {
        Some(position) if position < rows.len() => rows[position],
        _ => rows.last().map(|&p| p + 1).unwrap_or(children.len()),
    };
    children.insert(child_pos, row.into_node());
}

/// Remove rows by index.
///
/// Indices are sorted descending first so earlier removals cannot shift a
/// not-yet-processed index.
fn remove_rows(children: &mut Vec<XmlNode>, indices: &[usize]) {
    if indices.is_empty() {
        return;
    }
    let rows = element_positions(children, "a:tr");
    for row_index in descending(indices, rows.len()) {
        children.remove(rows[row_index]);
    }
}

/// Insert a grid column and a matching empty cell in every row. A table
/// without `a:tblGrid` is left unchanged.
fn add_column(children: &mut [XmlNode], insert: &ColumnInsert) {
    let Some(grid_pos) = children.iter().position(|n| n.is_element_named("a:tblGrid")) else {
        return;
    };
    let Some(grid) = children[grid_pos].as_element().map(Rc::clone) else {
        return;
    };

    let columns = element_positions(&grid.children, "a:gridCol");
    let grid_insert_pos = match insert.position {
        Some(position) if position < columns.len() => columns[position],
        _ => columns.last().map(|&p| p + 1).unwrap_or(grid.children.len()),
    };
    let mut grid_children = grid.children.clone();
    grid_children.insert(
        grid_insert_pos,
        XmlElement::new("a:gridCol")
            .with_attr("w", insert.width.to_string())
            .into_node(),
    );
    children[grid_pos] = XmlNode::Element(Rc::new(grid.with_children(grid_children)));

    let cell_offset = insert.position.unwrap_or(columns.len());
    for row_pos in element_positions(children, "a:tr") {
        let Some(row) = children[row_pos].as_element().map(Rc::clone) else {
            continue;
        };
        let cells = element_positions(&row.children, "a:tc");
        let insert_at = match cells.get(cell_offset) {
            Some(&pos) => pos,
            None => cells.last().map(|&p| p + 1).unwrap_or(row.children.len()),
        };
        let mut row_children = row.children.clone();
        row_children.insert(insert_at, empty_cell().into_node());
        children[row_pos] = XmlNode::Element(Rc::new(row.with_children(row_children)));
    }
}

/// Remove grid columns and the matching cell from every row, descending.
/// A table without `a:tblGrid` is left unchanged.
fn remove_columns(children: &mut [XmlNode], indices: &[usize]) {
    if indices.is_empty() {
        return;
    }
    let Some(grid_pos) = children.iter().position(|n| n.is_element_named("a:tblGrid")) else {
        return;
    };
    let Some(grid) = children[grid_pos].as_element().map(Rc::clone) else {
        return;
    };

    let columns = element_positions(&grid.children, "a:gridCol");
    let sorted = descending(indices, columns.len());
    if sorted.is_empty() {
        return;
    }

    let mut grid_children = grid.children.clone();
    for &column_index in &sorted {
        grid_children.remove(columns[column_index]);
    }
    children[grid_pos] = XmlNode::Element(Rc::new(grid.with_children(grid_children)));

    for row_pos in element_positions(children, "a:tr") {
        let Some(row) = children[row_pos].as_element().map(Rc::clone) else {
            continue;
        };
        let cells = element_positions(&row.children, "a:tc");
        let mut row_children = row.children.clone();
        for &column_index in &sorted {
            if let Some(&pos) = cells.get(column_index) {
                row_children.remove(pos);
            }
        }
        children[row_pos] = XmlNode::Element(Rc::new(row.with_children(row_children)));
    }
}

fn filled_cell(content: &CellContent) -> XmlElement {
    XmlElement::new("a:tc")
        .with_child(build_text_body(content))
        .with_child(XmlElement::new("a:tcPr"))
}

fn empty_cell() -> XmlElement {
    XmlElement::new("a:tc")
        .with_child(empty_text_body())
        .with_child(XmlElement::new("a:tcPr"))
}

/// Column count as declared by the grid; zero when `a:tblGrid` is absent.
fn grid_column_count(children: &[XmlNode]) -> usize {
    children
        .iter()
        .find_map(|n| n.as_element().filter(|el| el.name == "a:tblGrid"))
        .map(|grid| element_positions(&grid.children, "a:gridCol").len())
        .unwrap_or(0)
}

/// Positions of the named child elements within a children list.
fn element_positions(children: &[XmlNode], name: &str) -> Vec<usize> {
    children
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_element_named(name))
        .map(|(pos, _)| pos)
        .collect()
}

/// In-bounds indices, deduplicated, in descending order.
fn descending(indices: &[usize], len: usize) -> Vec<usize> {
    let mut sorted: Vec<usize> = indices.iter().copied().filter(|&i| i < len).collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    /// A slide with unrelated siblings at every ancestor level, a 3x2 table,
    /// and a second untouched graphic frame.
    fn slide_doc() -> XmlDocument {
        parse_document(concat!(
            "<!-- prolog -->",
            "<p:sld>",
            "<p:cSld>",
            "<p:bg/>",
            "<p:spTree>",
            "<p:sp/>",
            "<p:graphicFrame>",
            "<p:nvGraphicFramePr><p:cNvPr id=\"42\" name=\"Table 1\"/><p:cNvGraphicFramePr/></p:nvGraphicFramePr>",
            "<a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/table\">",
            "<a:before/>",
            "<a:tbl>",
            "<a:tblPr firstRow=\"1\"><a:tableStyleId>{OLD-GUID}</a:tableStyleId></a:tblPr>",
            "<a:tblGrid><a:gridCol w=\"100\"/><a:gridCol w=\"200\"/></a:tblGrid>",
            "<a:tr h=\"10\"><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>r0c0</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>",
            "<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>r0c1</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc></a:tr>",
            "<a:tr h=\"11\"><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>r1c0</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>",
            "<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>r1c1</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc></a:tr>",
            "<a:tr h=\"12\"><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>r2c0</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>",
            "<a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>r2c1</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc></a:tr>",
            "</a:tbl>",
            "<a:after/>",
            "</a:graphicData></a:graphic>",
            "</p:graphicFrame>",
            "<p:graphicFrame>",
            "<p:nvGraphicFramePr><p:cNvPr id=\"77\" name=\"Chart 2\"/></p:nvGraphicFramePr>",
            "<a:graphic><a:graphicData uri=\"chart\"/></a:graphic>",
            "</p:graphicFrame>",
            "</p:spTree>",
            "<p:extLst/>",
            "</p:cSld>",
            "<p:clrMapOvr/>",
            "<p:timing/>",
            "</p:sld>",
        ))
        .unwrap()
    }

    fn spec(shape_id: &str) -> TableUpdate {
        TableUpdate { shape_id: shape_id.to_string(), ..Default::default() }
    }

    fn table_of(doc: &XmlDocument) -> Rc<XmlElement> {
        let frame = doc
            .child("p:sld")
            .unwrap()
            .child("p:cSld")
            .unwrap()
            .child("p:spTree")
            .unwrap()
            .children_named("p:graphicFrame")
            .next()
            .unwrap()
            .clone();
        let tbl = frame
            .child("a:graphic")
            .unwrap()
            .child("a:graphicData")
            .unwrap()
            .child("a:tbl")
            .unwrap();
        Rc::clone(tbl)
    }

    fn row_texts(tbl: &XmlElement) -> Vec<Vec<String>> {
        tbl.children_named("a:tr")
            .map(|tr| tr.children_named("a:tc").map(|tc| tc.text()).collect())
            .collect()
    }

    #[test]
    fn test_empty_updates_return_same_document() {
        let doc = slide_doc();
        let result = apply_table_updates(&doc, &[]);
        assert_eq!(result.updated, 0);
        assert!(Rc::ptr_eq(doc.root().unwrap(), result.doc.root().unwrap()));
    }

    #[test]
    fn test_unresolvable_shape_id_is_skipped() {
        let doc = slide_doc();
        let result = apply_table_updates(&doc, &[spec("999")]);
        assert_eq!(result.updated, 0);
        assert!(Rc::ptr_eq(doc.root().unwrap(), result.doc.root().unwrap()));
    }

    #[test]
    fn test_every_missing_ancestor_hop_is_a_quiet_no_op() {
        let structurally_absent = [
            "<p:other/>",
            "<p:sld/>",
            "<p:sld><p:cSld/></p:sld>",
            "<p:sld><p:cSld><p:spTree><p:sp/></p:spTree></p:cSld></p:sld>",
            // Frame without a nonvisual id.
            "<p:sld><p:cSld><p:spTree><p:graphicFrame/></p:spTree></p:cSld></p:sld>",
            concat!(
                "<p:sld><p:cSld><p:spTree><p:graphicFrame>",
                "<p:nvGraphicFramePr><p:cNvPr id=\"42\"/></p:nvGraphicFramePr>",
                "</p:graphicFrame></p:spTree></p:cSld></p:sld>",
            ),
            // Graphic but no graphicData.
            concat!(
                "<p:sld><p:cSld><p:spTree><p:graphicFrame>",
                "<p:nvGraphicFramePr><p:cNvPr id=\"42\"/></p:nvGraphicFramePr>",
                "<a:graphic/></p:graphicFrame></p:spTree></p:cSld></p:sld>",
            ),
            // graphicData but no table.
            concat!(
                "<p:sld><p:cSld><p:spTree><p:graphicFrame>",
                "<p:nvGraphicFramePr><p:cNvPr id=\"42\"/></p:nvGraphicFramePr>",
                "<a:graphic><a:graphicData uri=\"chart\"/></a:graphic>",
                "</p:graphicFrame></p:spTree></p:cSld></p:sld>",
            ),
        ];

        for xml in structurally_absent {
            let doc = parse_document(xml).unwrap();
            let result = apply_table_updates(&doc, &[spec("42")]);
            assert_eq!(result.updated, 0, "expected skip for {xml}");
        }
    }

    #[test]
    fn test_resolvable_spec_with_empty_payload_counts_as_updated() {
        let doc = slide_doc();
        let result = apply_table_updates(&doc, &[spec("42")]);
        assert_eq!(result.updated, 1);
    }

    #[test]
    fn test_style_id_replacement() {
        let doc = slide_doc();
        let update = TableUpdate {
            style_id: Some("{NEW-GUID}".into()),
            ..spec("42")
        };
        let result = apply_table_updates(&doc, &[update]);
        assert_eq!(result.updated, 1);

        let tbl = table_of(&result.doc);
        let tbl_pr = tbl.child("a:tblPr").unwrap();
        assert_eq!(tbl_pr.child("a:tableStyleId").unwrap().text(), "{NEW-GUID}");
        // Other tblPr attributes survive.
        assert_eq!(tbl_pr.attr("firstRow"), Some("1"));
    }

    #[test]
    fn test_style_id_applies_without_grid() {
        let doc = parse_document(concat!(
            "<p:sld><p:cSld><p:spTree><p:graphicFrame>",
            "<p:nvGraphicFramePr><p:cNvPr id=\"42\"/></p:nvGraphicFramePr>",
            "<a:graphic><a:graphicData><a:tbl/></a:graphicData></a:graphic>",
            "</p:graphicFrame></p:spTree></p:cSld></p:sld>",
        ))
        .unwrap();

        let update = TableUpdate {
            style_id: Some("{GUID}".into()),
            // Requires column knowledge: quietly no-ops without a grid.
            add_columns: vec![ColumnInsert { width: 100, position: None }],
            remove_columns: vec![0],
            ..spec("42")
        };
        let result = apply_table_updates(&doc, &[update]);
        assert_eq!(result.updated, 1);

        let tbl = table_of(&result.doc);
        assert_eq!(tbl.child("a:tblPr").unwrap().child("a:tableStyleId").unwrap().text(), "{GUID}");
        assert!(tbl.child("a:tblGrid").is_none());
    }

    #[test]
    fn test_update_cell_replaces_text_body_only() {
        let doc = slide_doc();
        let update = TableUpdate {
            update_cells: vec![CellUpdate { row: 1, col: 1, content: "patched".into() }],
            ..spec("42")
        };
        let result = apply_table_updates(&doc, &[update]);

        let tbl = table_of(&result.doc);
        assert_eq!(
            row_texts(&tbl),
            vec![
                vec!["r0c0".to_string(), "r0c1".to_string()],
                vec!["r1c0".to_string(), "patched".to_string()],
                vec!["r2c0".to_string(), "r2c1".to_string()],
            ]
        );

        // The edited cell keeps its tcPr.
        let row = tbl.children_named("a:tr").nth(1).unwrap();
        let tc = row.children_named("a:tc").nth(1).unwrap();
        assert!(tc.child("a:tcPr").is_some());

        // Untouched rows are shared with the source tree.
        let old_tbl = table_of(&doc);
        let old_rows: Vec<_> = old_tbl.children_named("a:tr").collect();
        let new_rows: Vec<_> = tbl.children_named("a:tr").collect();
        assert!(Rc::ptr_eq(old_rows[0], new_rows[0]));
        assert!(Rc::ptr_eq(old_rows[2], new_rows[2]));
        assert!(!Rc::ptr_eq(old_rows[1], new_rows[1]));
    }

    #[test]
    fn test_add_row_pads_to_grid_width() {
        let doc = slide_doc();
        let update = TableUpdate {
            add_rows: vec![RowInsert { height: 99, cells: vec!["only".into()], position: None }],
            ..spec("42")
        };
        let result = apply_table_updates(&doc, &[update]);

        let tbl = table_of(&result.doc);
        let rows: Vec<_> = tbl.children_named("a:tr").collect();
        assert_eq!(rows.len(), 4);
        let added = rows[3];
        assert_eq!(added.attr("h"), Some("99"));
        assert_eq!(added.children_named("a:tc").count(), 2);
        assert_eq!(added.children_named("a:tc").next().unwrap().text(), "only");
    }

    #[test]
    fn test_add_rows_apply_sequentially_with_positions() {
        let doc = slide_doc();
        let update = TableUpdate {
            add_rows: vec![
                RowInsert { height: 1, cells: vec!["first".into()], position: Some(0) },
                RowInsert { height: 2, cells: vec!["second".into()], position: Some(1) },
            ],
            ..spec("42")
        };
        let result = apply_table_updates(&doc, &[update]);

        let tbl = table_of(&result.doc);
        let first_cells: Vec<String> =
            row_texts(&tbl).into_iter().map(|row| row[0].clone()).collect();
        // The second insert lands relative to the row list as already
        // modified by the first.
        assert_eq!(first_cells, vec!["first", "second", "r0c0", "r1c0", "r2c0"]);
    }

    #[test]
    fn test_remove_rows_descending_order_is_internal() {
        for indices in [vec![0, 2], vec![2, 0]] {
            let doc = slide_doc();
            let update = TableUpdate { remove_rows: indices, ..spec("42") };
            let result = apply_table_updates(&doc, &[update]);

            let tbl = table_of(&result.doc);
            assert_eq!(row_texts(&tbl), vec![vec!["r1c0".to_string(), "r1c1".to_string()]]);
        }
    }

    #[test]
    fn test_add_column_extends_grid_and_rows() {
        let doc = slide_doc();
        let update = TableUpdate {
            add_columns: vec![ColumnInsert { width: 300, position: Some(1) }],
            ..spec("42")
        };
        let result = apply_table_updates(&doc, &[update]);

        let tbl = table_of(&result.doc);
        let grid = tbl.child("a:tblGrid").unwrap();
        let widths: Vec<_> =
            grid.children_named("a:gridCol").map(|c| c.attr("w").unwrap().to_string()).collect();
        assert_eq!(widths, vec!["100", "300", "200"]);
        assert_eq!(
            row_texts(&tbl),
            vec![
                vec!["r0c0".to_string(), String::new(), "r0c1".to_string()],
                vec!["r1c0".to_string(), String::new(), "r1c1".to_string()],
                vec!["r2c0".to_string(), String::new(), "r2c1".to_string()],
            ]
        );
    }

    #[test]
    fn test_remove_columns_updates_grid_and_rows() {
        let doc = slide_doc();
        let update = TableUpdate { remove_columns: vec![0], ..spec("42") };
        let result = apply_table_updates(&doc, &[update]);

        let tbl = table_of(&result.doc);
        let grid = tbl.child("a:tblGrid").unwrap();
        assert_eq!(grid.children_named("a:gridCol").count(), 1);
        assert_eq!(
            row_texts(&tbl),
            vec![
                vec!["r0c1".to_string()],
                vec!["r1c1".to_string()],
                vec!["r2c1".to_string()],
            ]
        );
    }

    #[test]
    fn test_unrelated_siblings_survive_by_reference() {
        let doc = slide_doc();
        let update = TableUpdate {
            update_cells: vec![CellUpdate { row: 0, col: 0, content: "x".into() }],
            ..spec("42")
        };
        let result = apply_table_updates(&doc, &[update]);

        // Top level: the prolog comment is still first.
        assert!(matches!(&result.doc.children[0], XmlNode::Comment(c) if c.contains("prolog")));

        let (old_sld, new_sld) = (doc.child("p:sld").unwrap(), result.doc.child("p:sld").unwrap());
        assert!(!Rc::ptr_eq(old_sld, new_sld));
        // Siblings of the rebuilt spine are the same nodes at every level.
        assert!(Rc::ptr_eq(
            old_sld.child("p:clrMapOvr").unwrap(),
            new_sld.child("p:clrMapOvr").unwrap()
        ));
        assert!(Rc::ptr_eq(old_sld.child("p:timing").unwrap(), new_sld.child("p:timing").unwrap()));

        let (old_c_sld, new_c_sld) =
            (old_sld.child("p:cSld").unwrap(), new_sld.child("p:cSld").unwrap());
        assert!(Rc::ptr_eq(old_c_sld.child("p:bg").unwrap(), new_c_sld.child("p:bg").unwrap()));
        assert!(Rc::ptr_eq(
            old_c_sld.child("p:extLst").unwrap(),
            new_c_sld.child("p:extLst").unwrap()
        ));

        let (old_tree, new_tree) =
            (old_c_sld.child("p:spTree").unwrap(), new_c_sld.child("p:spTree").unwrap());
        assert!(Rc::ptr_eq(old_tree.child("p:sp").unwrap(), new_tree.child("p:sp").unwrap()));
        // The second graphic frame was not on the edit path.
        let old_frames: Vec<_> = old_tree.children_named("p:graphicFrame").collect();
        let new_frames: Vec<_> = new_tree.children_named("p:graphicFrame").collect();
        assert!(Rc::ptr_eq(old_frames[1], new_frames[1]));

        let old_data = old_frames[0].child("a:graphic").unwrap().child("a:graphicData").unwrap();
        let new_data = new_frames[0].child("a:graphic").unwrap().child("a:graphicData").unwrap();
        assert!(Rc::ptr_eq(old_data.child("a:before").unwrap(), new_data.child("a:before").unwrap()));
        assert!(Rc::ptr_eq(old_data.child("a:after").unwrap(), new_data.child("a:after").unwrap()));

        // Sibling order inside graphicData is unchanged.
        assert_eq!(
            new_data.element_children().map(|el| el.name.as_str()).collect::<Vec<_>>(),
            vec!["a:before", "a:tbl", "a:after"]
        );
    }

    #[test]
    fn test_specs_chain_across_one_batch() {
        let doc = slide_doc();
        let updates = [
            TableUpdate {
                update_cells: vec![CellUpdate { row: 0, col: 0, content: "first pass".into() }],
                ..spec("42")
            },
            TableUpdate { remove_rows: vec![2], ..spec("42") },
            spec("999"),
        ];
        let result = apply_table_updates(&doc, &updates);
        assert_eq!(result.updated, 2);

        let tbl = table_of(&result.doc);
        assert_eq!(tbl.children_named("a:tr").count(), 2);
        assert_eq!(row_texts(&tbl)[0][0], "first pass");
    }

    #[test]
    fn test_update_spec_deserializes_from_json() {
        let update: TableUpdate = serde_json::from_str(
            r#"{
                "shapeId": "42",
                "styleId": "{GUID}",
                "updateCells": [{"row": 0, "col": 1, "content": "plain"}],
                "addRows": [{"height": 370840, "cells": [[{"text": "rich", "bold": true}]]}],
                "removeRows": [2, 0],
                "addColumns": [{"width": 914400, "position": 1}],
                "removeColumns": [1]
            }"#,
        )
        .unwrap();
        assert_eq!(update.shape_id, "42");
        assert_eq!(update.update_cells.len(), 1);
        assert_eq!(update.remove_rows, vec![2, 0]);
        assert_eq!(update.add_columns[0].position, Some(1));
    }
}
