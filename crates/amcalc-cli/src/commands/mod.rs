pub mod amortization;
