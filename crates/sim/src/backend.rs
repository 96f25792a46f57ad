use qram_circuit::{Circuit, Instruction};

/// Anything that can execute circuit instructions in order.
pub trait Backend {
    type Error: std::error::Error;

    fn execute(&mut self, instruction: &Instruction) -> Result<(), Self::Error>;

    fn run_instructions(&mut self, instructions: &[Instruction]) -> Result<(), Self::Error> {
        for instruction in instructions {
            self.execute(instruction)?;
        }
        Ok(())
    }

    fn run(&mut self, circuit: &Circuit) -> Result<(), Self::Error> {
        self.run_instructions(circuit.instructions())
    }
}
