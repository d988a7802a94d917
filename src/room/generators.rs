use rand::Rng;

/// Characters used in room codes
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Trait for generating room codes
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random fixed-length code generator over [`ROOM_CODE_ALPHABET`]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect()
    }
}

/// Canonical form used for registry lookups
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Returns the trimmed name, or a generated pet name when it is blank
pub fn display_name_or_default(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        petname::Petnames::default().generate_one(2, "-")
    } else {
        trimmed.to_string()
    }
}
