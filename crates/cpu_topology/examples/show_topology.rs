//! Prints the cores and NUMA nodes the current thread may use.

use cpu_topology::Processor;

fn main() {
    let processor = Processor::new();

    match processor.available_cores() {
        Ok(cores) => {
            println!("{} cores available to this thread:", cores.len());
            for core in cores {
                println!("  {core}");
            }
        }
        Err(error) => println!("core discovery failed: {error}"),
    }

    match processor.available_numa_nodes() {
        Ok(nodes) => {
            println!("{} NUMA nodes available to this thread:", nodes.len());
            for node in nodes {
                println!("  {node}");
            }
        }
        Err(error) => println!("NUMA discovery failed: {error}"),
    }
}
