pub mod allocator;
pub mod normalize;
