use hollowdeck_core::AnimationNode;

/// Print one node's frames to stdout, separated by blank lines.
pub fn run(pattern: &str, index: usize, ticks: u32, corrupt: bool) {
    let kind = super::parse_pattern(pattern);
    let mut node = AnimationNode::new(kind, index);

    println!("{}", node.current_frame().to_text());
    for _ in 0..ticks {
        let frame = if corrupt {
            node.advance()
        } else {
            node.advance();
            node.current_frame()
        };
        println!();
        println!("{}", frame.to_text());
    }
}
