// Smartmarks services
// Services provide shared infrastructure: change notification fan-out and
// identity resolution.

pub mod change_hub;
pub mod identity;
