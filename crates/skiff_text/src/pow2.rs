/// Next power of two at or above `size` (minimum 1).
pub fn next_pow2(size: u32) -> u32 {
    size.max(1).next_power_of_two()
}
