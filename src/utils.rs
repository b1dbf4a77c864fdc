use bitflags::bitflags;

bitflags! {
    /// Operator classes consulted when deciding where concatenation is implicit.
    pub struct TokenClass: u8 {
        const OPERAND = 1 << 0;
        const OPEN_GROUP = 1 << 1;
        const CLOSE_GROUP = 1 << 2;
        const BINARY = 1 << 3;
        const POSTFIX = 1 << 4;

        // left side of an implicit concatenation: something that closes an operand
        const ENDS_OPERAND = Self::OPERAND.bits | Self::CLOSE_GROUP.bits | Self::POSTFIX.bits;
        // right side of an implicit concatenation: something that opens an operand
        const BEGINS_OPERAND = Self::OPERAND.bits | Self::OPEN_GROUP.bits;
    }
}
