use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRange {
    pub index: usize,
    pub start_row: usize,
    pub end_row: usize,
    pub is_last: bool,
}

impl BatchRange {
    pub fn rows(&self) -> Range<usize> {
        self.start_row..self.end_row
    }

    pub fn row_count(&self) -> usize {
        self.end_row - self.start_row
    }
}

pub struct BatchPlanner {
    batch_size: usize,
}

impl BatchPlanner {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn calculate_batches(&self, total_rows: usize) -> Vec<BatchRange> {
        let mut batches = Vec::new();
        let mut current_start = 0;
        let mut batch_index = 0;

        while current_start < total_rows {
            let end_row = (current_start + self.batch_size).min(total_rows);

            batches.push(BatchRange {
                index: batch_index,
                start_row: current_start,
                end_row,
                is_last: end_row >= total_rows,
            });

            current_start = end_row;
            batch_index += 1;
        }

        batches
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}
