pub mod reflow;
