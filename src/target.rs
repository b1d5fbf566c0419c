/// One captured page awaiting judgment.
#[derive(Debug, Clone)]
pub struct EvaluationTarget {
    pub route: String,
    pub image: Vec<u8>,
}

impl EvaluationTarget {
    pub fn new(route: impl Into<String>, image: Vec<u8>) -> Self {
        Self {
            route: route.into(),
            image,
        }
    }
}
