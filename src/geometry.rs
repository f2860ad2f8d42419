pub mod airfoil;
pub mod panel;
pub mod point;
