pub mod blocks;
pub mod html;
