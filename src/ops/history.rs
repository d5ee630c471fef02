use super::DrawOp;

/// The paint log plus the ops taken off it by undo
#[derive(Debug, Default, Clone)]
pub struct OpHistory {
    /// Committed ops in paint order
    ops: Vec<DrawOp>,
    /// Ops removed by undo, most recent last
    undone: Vec<DrawOp>,
}

impl OpHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new op. Anything that could have been redone is dropped.
    pub fn commit(&mut self, op: DrawOp) {
        self.ops.push(op);
        self.undone.clear();
    }

    /// Moves the newest op onto the redo stack. Returns false if the log is empty.
    pub fn undo(&mut self) -> bool {
        match self.ops.pop() {
            Some(op) => {
                self.undone.push(op);
                true
            }
            None => false,
        }
    }

    /// Moves the most recently undone op back onto the log.
    pub fn redo(&mut self) -> bool {
        match self.undone.pop() {
            Some(op) => {
                self.ops.push(op);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.undone.clear();
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn undone(&self) -> &[DrawOp] {
        &self.undone
    }

    pub fn can_undo(&self) -> bool {
        !self.ops.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }
}
