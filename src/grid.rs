//! Span pre-expansion.
//!
//! The driver consumes a physical grid in which every position of a
//! multi-column or multi-row cell references the same [`Cell`]
//! allocation. This helper produces that grid from logical rows, carrying
//! rowspan cells down into the following rows.

use std::rc::Rc;

use crate::models::Cell;

pub fn expand_grid(rows: Vec<Vec<Cell>>) -> Vec<Vec<Rc<Cell>>> {
    let mut cols_fill: Vec<Option<Rc<Cell>>> = Vec::new(); // Filling for columns with rowspan > 1
    let mut cols_filled: Vec<usize> = Vec::new(); // Remaining rows to fill
    let mut out = Vec::new();

    for row_cells in rows {
        let mut row: Vec<Rc<Cell>> = Vec::new();
        for mut cell in row_cells {
            while row.len() < cols_filled.len() && cols_filled[row.len()] > 0 {
                cols_filled[row.len()] -= 1;
                row.push(cols_fill[row.len()].clone().expect("fill cell present"));
            }
            cell.start = row.len();
            let cell = Rc::new(cell);
            for _ in 0..cell.colspan {
                if cell.rowspan > 1 {
                    while cols_fill.len() <= row.len() {
                        cols_fill.push(None);
                        cols_filled.push(0);
                    }
                    cols_fill[row.len()] = Some(cell.clone());
                    cols_filled[row.len()] = cell.rowspan - 1;
                }
                row.push(cell.clone());
            }
        }
        if row.is_empty() {
            continue;
        }
        while row.len() < cols_filled.len() && cols_filled[row.len()] > 0 {
            cols_filled[row.len()] -= 1;
            row.push(cols_fill[row.len()].clone().expect("fill cell present"));
        }
        out.push(row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colspan_repeats_share_identity() {
        let rows = vec![vec![Cell::header("Singular").spanning(2, 1), Cell::header("Plural")]];
        let grid = expand_grid(rows);
        assert_eq!(grid[0].len(), 3);
        assert!(Rc::ptr_eq(&grid[0][0], &grid[0][1]));
        assert!(!Rc::ptr_eq(&grid[0][1], &grid[0][2]));
        assert_eq!(grid[0][2].start, 2);
    }

    #[test]
    fn rowspan_carries_into_following_rows() {
        let rows = vec![
            vec![Cell::header("Indicative").spanning(1, 2), Cell::data("gehe")],
            vec![Cell::data("gehst")],
        ];
        let grid = expand_grid(rows);
        assert_eq!(grid.len(), 2);
        assert!(Rc::ptr_eq(&grid[0][0], &grid[1][0]));
        assert_eq!(grid[1][1].text, "gehst");
    }

    #[test]
    fn empty_rows_are_dropped() {
        let rows = vec![vec![], vec![Cell::data("x")]];
        let grid = expand_grid(rows);
        assert_eq!(grid.len(), 1);
    }
}
