pub mod threshold_tests;
pub mod tensor_tests;
