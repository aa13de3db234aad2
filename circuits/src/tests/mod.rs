mod aes;
mod commitment;
mod ctr;
mod mimc;
mod uint32;
