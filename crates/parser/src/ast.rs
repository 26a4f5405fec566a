//! Raw task records as they appear in a pipeline file.

/// Root node: every record before `END` or end of input.
#[derive(Debug, Clone, Default)]
pub struct AstPipeline {
    pub records: Vec<AstTask>,
}

/// One four-line task record.
#[derive(Debug, Clone)]
pub struct AstTask {
    pub name: String,
    pub duration: u32,
    pub group: Option<String>,
    pub dependencies: Vec<String>,
}
