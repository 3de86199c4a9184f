use lopdf::Document;

/// A decoded document that can hand out text one page at a time.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Text of page `number`, 1-based.
    fn page_text(&mut self, number: usize) -> Result<String, String>;
}

/// Opens raw bytes as a [`PageSource`]. Runs on the worker thread.
pub trait DocumentLoader: Send + Sync {
    fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn PageSource>, String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LopdfLoader;

struct LopdfPages {
    document: Document,
    page_numbers: Vec<u32>,
}

impl PageSource for LopdfPages {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&mut self, number: usize) -> Result<String, String> {
        let page = number
            .checked_sub(1)
            .and_then(|index| self.page_numbers.get(index))
            .copied()
            .ok_or_else(|| format!("page {} does not exist", number))?;

        self.document
            .extract_text(&[page])
            .map_err(|e| e.to_string())
    }
}

impl DocumentLoader for LopdfLoader {
    fn open(&self, bytes: Vec<u8>) -> Result<Box<dyn PageSource>, String> {
        let document = Document::load_mem(&bytes).map_err(|e| e.to_string())?;

        if document.is_encrypted() {
            return Err("document is encrypted".to_string());
        }

        let page_numbers = document.get_pages().into_keys().collect();
        Ok(Box::new(LopdfPages {
            document,
            page_numbers,
        }))
    }
}
