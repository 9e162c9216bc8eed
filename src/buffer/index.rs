use std::sync::Arc;

/// Immutable triangle/line index list. Indices address the bound [`VertexBuffer`].
///
/// [`VertexBuffer`]: crate::buffer::vertex::VertexBuffer
#[derive(Clone, Debug)]
pub struct IndexBuffer {
    indices: Arc<[u32]>,
}

impl IndexBuffer {
    pub fn new(indices: impl Into<Arc<[u32]>>) -> Self {
        Self {
            indices: indices.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub(crate) fn shared(&self) -> Arc<[u32]> {
        Arc::clone(&self.indices)
    }

    /// Largest index, used to validate a draw against the vertex buffer.
    pub fn max_index_in(&self, start: usize, count: usize) -> Option<u32> {
        self.indices.get(start..start.checked_add(count)?)?.iter().copied().max()
    }
}

impl From<Vec<u32>> for IndexBuffer {
    fn from(indices: Vec<u32>) -> Self {
        Self::new(indices)
    }
}
