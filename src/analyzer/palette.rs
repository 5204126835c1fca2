/// Series colours, cycled by position.
pub const COLORS: [&str; 10] = [
    "#00d4ff", "#7c3aed", "#10b981", "#f59e0b", "#ef4444", "#a855f7", "#06b6d4", "#f97316",
    "#84cc16", "#ec4899",
];

/// Bucket colours from best to worst.
pub const BUCKET_COLORS: [&str; 4] = ["#10b981", "#f59e0b", "#f97316", "#ef4444"];

pub fn color_at(index: usize) -> &'static str {
    COLORS[index % COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycles() {
        assert_eq!(color_at(0), "#00d4ff");
        assert_eq!(color_at(10), color_at(0));
        assert_eq!(color_at(13), "#f59e0b");
    }
}
