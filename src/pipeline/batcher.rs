#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub origin: usize,
    pub text: String,
}

impl TextItem {
    pub fn new(origin: usize, text: String) -> Self {
        Self { origin, text }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

pub type Batch = Vec<TextItem>;

pub fn pack_batches(items: Vec<TextItem>, max_chars: usize) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut current: Batch = Vec::new();
    let mut count = 0;

    for item in items {
        let len = item.char_count();
        if !current.is_empty() && count + len > max_chars {
            batches.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(item);
        count += len;
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
